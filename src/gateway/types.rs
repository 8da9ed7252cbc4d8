//! Payload types for API requests/responses.

pub const NO_STATUS_OUTPUT: &str = "No status output received.";
pub const NO_LOGS_OUTPUT: &str = "No logs available.";
pub const NO_FILE_CONTENT: &str = "No file content received.";
pub const NO_FILE_PATH: &str = "N/A";

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

/// Reply to a control action or a file write.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    /// Set by file writes: where the server wrote the content.
    #[serde(default)]
    pub file_path: Option<String>,
}

impl ActionReply {
    /// The server's own success message, else `<fallback> <output>`.
    pub fn message_or(&self, fallback: &str) -> String {
        if let Some(s) = non_empty(&self.success) {
            return s.to_string();
        }
        format!("{} {}", fallback, self.output.as_deref().unwrap_or(""))
            .trim()
            .to_string()
    }

    /// Message for a completed file write, naming the written path when the
    /// server reported one.
    pub fn saved_message(&self) -> String {
        match non_empty(&self.file_path) {
            Some(path) => self.message_or(&format!("File saved to {}.", path)),
            None => self.message_or("File saved."),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileReply {
    #[serde(default)]
    pub file_content: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl FileReply {
    pub fn content(&self) -> &str {
        non_empty(&self.file_content).unwrap_or(NO_FILE_CONTENT)
    }

    pub fn path(&self) -> &str {
        non_empty(&self.file_path).unwrap_or(NO_FILE_PATH)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub status_output: Option<String>,
}

impl StatusReply {
    pub fn text(&self) -> &str {
        non_empty(&self.status_output).unwrap_or(NO_STATUS_OUTPUT)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LogsReply {
    #[serde(default)]
    pub logs_output: Option<String>,
}

impl LogsReply {
    pub fn text(&self) -> &str {
        non_empty(&self.logs_output).unwrap_or(NO_LOGS_OUTPUT)
    }
}

#[derive(Debug, serde::Serialize)]
pub(super) struct WriteFileRequest<'a> {
    pub(super) content: &'a str,
}
