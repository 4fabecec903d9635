use serde::{Deserialize, Serialize};

/// Host event kinds a tracker listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    PointerEnter,
    PointerMove,
    PointerLeave,
    TouchStart,
    TouchMove,
    TouchEnd,
}

/// What a tracker does with an event, independent of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPhase {
    Enter,
    Move,
    Leave,
}

impl InputKind {
    pub fn phase(self) -> InputPhase {
        match self {
            InputKind::PointerEnter | InputKind::TouchStart => InputPhase::Enter,
            InputKind::PointerMove | InputKind::TouchMove => InputPhase::Move,
            InputKind::PointerLeave | InputKind::TouchEnd => InputPhase::Leave,
        }
    }

    pub fn is_touch(self) -> bool {
        matches!(
            self,
            InputKind::TouchStart | InputKind::TouchMove | InputKind::TouchEnd
        )
    }
}

/// One active touch contact in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

/// A raw pointer-class or touch-class event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputEvent {
    pub kind: InputKind,
    #[serde(default)]
    pub client_x: Option<f64>,
    #[serde(default)]
    pub client_y: Option<f64>,
    #[serde(default)]
    pub touches: Vec<TouchPoint>,
}

impl InputEvent {
    /// Pointer event carrying its own viewport coordinates
    pub fn pointer(kind: InputKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            client_x: Some(x),
            client_y: Some(y),
            touches: Vec::new(),
        }
    }

    /// Touch event whose contacts are listed primary first
    pub fn touch(kind: InputKind, touches: Vec<TouchPoint>) -> Self {
        Self {
            kind,
            client_x: None,
            client_y: None,
            touches,
        }
    }

    /// Event without any coordinate (leave, touch end)
    pub fn bare(kind: InputKind) -> Self {
        Self {
            kind,
            client_x: None,
            client_y: None,
            touches: Vec::new(),
        }
    }
}
