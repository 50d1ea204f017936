/// Reason reported when the browser exposes no clipboard API, which is the
/// case on pages served over plain http from a non-local address.
pub const CLIPBOARD_UNAVAILABLE: &str = "clipboard unavailable (insecure context)";

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A non-blocking message for the user, shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    /// Outcome of a copy-to-clipboard action. Both outcomes are reported.
    pub fn copy_result(result: &Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::success("Code copied to clipboard!"),
            Err(reason) => Self::error(format!("Failed to copy: {reason}")),
        }
    }

    /// An attached image that could not be read into a data URL.
    pub fn image_read_failed(reason: &str) -> Self {
        Self::error(format!("Failed to read image: {reason}"))
    }

    /// A text span the markdown formatter rejected; it is shown as raw text.
    pub fn formatting_failed() -> Self {
        Self::info("Some message text could not be formatted and is shown as plain text")
    }

    pub fn css_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Success => "toast success",
            NoticeLevel::Error => "toast error",
            NoticeLevel::Info => "toast info",
        }
    }
}
