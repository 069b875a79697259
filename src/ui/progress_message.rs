/// Lifecycle of one progress handle, as seen by a channel observer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    Started {
        label: String,
    },
    Message {
        label: String,
        message: String,
    },
    Finished {
        label: String,
    },
}
