/// Running text of the conversation as shown to the user.
#[derive(Debug, Clone, Default)]
pub struct ConversationTrail {
    text: String,
}

impl ConversationTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: &str) {
        self.text.push_str("\nUser: ");
        self.text.push_str(text);
    }

    pub fn push_assistant(&mut self, text: &str) {
        self.text.push_str("\nAssistant: ");
        self.text.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
