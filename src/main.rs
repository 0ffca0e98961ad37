use leptos::prelude::*;
use repo_chat_ui::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
