use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Plain-text banner answered on `/`.
pub const LIVENESS_BANNER: &str = "Service Spot Cooking";
