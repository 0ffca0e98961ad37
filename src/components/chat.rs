use leptos::prelude::*;

use crate::api::{ChatResponse, ModelStatus, Source};

#[derive(Clone, Debug, PartialEq)]
pub enum Author {
	User,
	Assistant { model: String, model_name: String },
	System,
	Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
	pub text: String,
	pub author: Author,
	pub sources: Vec<Source>,
}

impl ChatMessage {
	pub fn user(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			author: Author::User,
			sources: Vec::new(),
		}
	}

	pub fn error(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			author: Author::Error,
			sources: Vec::new(),
		}
	}

	pub fn greeting(repo: &str) -> Self {
		Self {
			text: format!(
				"I've indexed your repository \"{repo}\" and I'm ready to answer questions about your code. What would you like to know?"
			),
			author: Author::System,
			sources: Vec::new(),
		}
	}

	pub fn is_user(&self) -> bool {
		self.author == Author::User
	}

	/// Caption shown above a non-user message.
	pub fn caption(&self) -> Option<String> {
		match &self.author {
			Author::User => None,
			Author::Assistant { model, model_name } if model_name.is_empty() => Some(model.clone()),
			Author::Assistant { model, model_name } => Some(format!("{model} · {model_name}")),
			Author::System => Some("System".into()),
			Author::Error => Some("Error".into()),
		}
	}
}

impl From<ChatResponse> for ChatMessage {
	fn from(response: ChatResponse) -> Self {
		Self {
			text: response.answer,
			author: Author::Assistant {
				model: response.model,
				model_name: response.model_name,
			},
			sources: response.sources,
		}
	}
}

#[component]
pub fn ChatMessageView(message: ChatMessage) -> impl IntoView {
	let class = match message.author {
		Author::User => "chat-message user",
		Author::Error => "chat-message error",
		_ => "chat-message assistant",
	};
	let caption = message.caption();
	let sources = message.sources;

	view! {
		<div class=class>
			{caption.map(|c| view! { <div class="chat-message-caption">{c}</div> })}
			<div class="chat-message-text">{message.text}</div>
			{(!sources.is_empty())
				.then(|| {
					view! {
						<ul class="chat-message-sources">
							{sources
								.iter()
								.map(|s| {
									view! {
										<li title=s.filepath.clone()>
											{format!("{} ({:.0}%)", s.filename, s.relevance * 100.0)}
										</li>
									}
								})
								.collect_view()}
						</ul>
					}
				})}
		</div>
	}
}

#[component]
pub fn TypingIndicator() -> impl IntoView {
	view! {
		<div class="chat-message assistant typing">
			<span class="dot" />
			<span class="dot" />
			<span class="dot" />
		</div>
	}
}

#[component]
pub fn ChatInput(
	query: RwSignal<String>,
	#[prop(into)] is_loading: Signal<bool>,
	#[prop(into)] model_status: Signal<Option<ModelStatus>>,
	#[prop(into)] on_send: Callback<()>,
) -> impl IntoView {
	let can_send = move || !is_loading.get() && !query.read().trim().is_empty();

	view! {
		<div class="chat-input">
			<input
				type="text"
				placeholder="Ask anything about your code..."
				prop:value=move || query.get()
				prop:disabled=move || is_loading.get()
				on:input=move |ev| query.set(event_target_value(&ev))
				on:keydown=move |ev| {
					if ev.key() == "Enter" && !ev.shift_key() {
						ev.prevent_default();
						on_send.run(());
					}
				}
			/>
			<button disabled=move || !can_send() on:click=move |_| on_send.run(())>
				"Send"
			</button>
			<span class="chat-input-model">
				{move || model_status.get().map(|m| format!("via {}", m.label())).unwrap_or_default()}
			</span>
		</div>
	}
}
