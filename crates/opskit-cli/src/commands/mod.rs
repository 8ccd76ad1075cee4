pub mod init;
pub mod object_event;
pub mod scale;
pub mod summarize;
