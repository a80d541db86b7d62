#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadCatalog {
        url: String,
    },
    LoadCardDetail {
        name: String,
        url: String,
        generation: u64,
    },
    CancelCardDetail {
        name: String,
    },
    LoadOverlayDetail {
        url: String,
        generation: u64,
    },
    CancelOverlayDetail,
}

impl Effect {
    /// Task key under which the effect's fetch runs. Spawning under a key that
    /// is already running replaces the older task.
    pub fn task_key(&self) -> String {
        match self {
            Effect::LoadCatalog { .. } => "catalog".to_string(),
            Effect::LoadCardDetail { name, .. } | Effect::CancelCardDetail { name } => {
                card_task_key(name)
            }
            Effect::LoadOverlayDetail { .. } | Effect::CancelOverlayDetail => "overlay".to_string(),
        }
    }
}

pub fn card_task_key(name: &str) -> String {
    format!("card:{name}")
}
