use camino::Utf8PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("read {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk {root}")]
    Walk {
        root: Utf8PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("policy path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },

    #[error("parse policy {path}")]
    Policy {
        path: Utf8PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("parse policy yaml")]
    PolicyText(#[source] serde_yaml::Error),

    #[error("parse inventory {path}")]
    Inventory {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("parse inventory json")]
    InventoryText(#[source] serde_json::Error),

    #[error("no NAME in {path}")]
    NoFingerprint { path: Utf8PathBuf },
}
