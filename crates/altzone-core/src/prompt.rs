// ── Confirmation / edit prompt ──
//
// At most one prompt is open per controller. The open prompt owns its
// target (and, for edits, the buffer), so a confirm always acts on the
// item the user saw when the prompt opened.

use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PromptState<T, B> {
    #[default]
    Closed,
    ConfirmingDelete(T),
    Editing {
        target: T,
        buffer: B,
    },
}

impl<T, B> PromptState<T, B> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Open a delete confirmation for `target`.
    pub fn open_delete(&mut self, target: T) -> Result<(), CoreError> {
        self.ensure_closed()?;
        *self = Self::ConfirmingDelete(target);
        Ok(())
    }

    /// Open an edit prompt pre-populated with `buffer`.
    pub fn open_edit(&mut self, target: T, buffer: B) -> Result<(), CoreError> {
        self.ensure_closed()?;
        *self = Self::Editing { target, buffer };
        Ok(())
    }

    /// Close the prompt, returning whatever was open.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn buffer_mut(&mut self) -> Option<&mut B> {
        match self {
            Self::Editing { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<&T> {
        match self {
            Self::Closed => None,
            Self::ConfirmingDelete(target) | Self::Editing { target, .. } => Some(target),
        }
    }

    fn ensure_closed(&self) -> Result<(), CoreError> {
        if self.is_open() {
            Err(CoreError::PromptBusy)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Prompt = PromptState<&'static str, String>;

    #[test]
    fn second_prompt_is_rejected_until_closed() {
        let mut prompt = Prompt::default();
        assert!(prompt.open_delete("q1").is_ok());
        assert!(matches!(
            prompt.open_edit("q2", String::new()),
            Err(CoreError::PromptBusy)
        ));
        assert_eq!(prompt.target(), Some(&"q1"));

        assert_eq!(prompt.take(), PromptState::ConfirmingDelete("q1"));
        assert!(!prompt.is_open());
        assert!(prompt.open_edit("q2", "draft".into()).is_ok());
    }

    #[test]
    fn buffer_only_exists_while_editing() {
        let mut prompt = Prompt::default();
        assert!(prompt.buffer_mut().is_none());

        prompt.open_edit("q1", "old".into()).ok();
        if let Some(buffer) = prompt.buffer_mut() {
            buffer.push_str(" new");
        }
        assert_eq!(
            prompt.take(),
            PromptState::Editing {
                target: "q1",
                buffer: "old new".into()
            }
        );
    }
}
