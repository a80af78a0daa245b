//! Player input bitmask and activation-button resolution.

use tracing::warn;

// ── Buttons ─────────────────────────────────────────────────────────

/// Held-button bitmask as reported by the host each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Buttons(pub u64);

impl Buttons {
    /// No buttons held.
    pub const NONE: Self = Self(0);
    pub const ATTACK: Self = Self(1 << 0);
    pub const JUMP: Self = Self(1 << 1);
    pub const DUCK: Self = Self(1 << 2);
    pub const FORWARD: Self = Self(1 << 3);
    pub const BACK: Self = Self(1 << 4);
    pub const USE: Self = Self(1 << 5);
    pub const CANCEL: Self = Self(1 << 6);
    pub const LEFT: Self = Self(1 << 7);
    pub const RIGHT: Self = Self(1 << 8);
    pub const MOVELEFT: Self = Self(1 << 9);
    pub const MOVERIGHT: Self = Self(1 << 10);
    pub const ATTACK2: Self = Self(1 << 11);
    pub const RUN: Self = Self(1 << 12);
    pub const RELOAD: Self = Self(1 << 13);
    pub const ALT1: Self = Self(1 << 14);
    pub const ALT2: Self = Self(1 << 15);
    pub const SPEED: Self = Self(1 << 16);
    pub const WALK: Self = Self(1 << 17);
    pub const ZOOM: Self = Self(1 << 18);
    pub const WEAPON1: Self = Self(1 << 19);
    pub const WEAPON2: Self = Self(1 << 20);
    pub const BULLRUSH: Self = Self(1 << 21);
    pub const GRENADE1: Self = Self(1 << 22);
    pub const GRENADE2: Self = Self(1 << 23);
    pub const ATTACK3: Self = Self(1 << 24);
    /// Scoreboard key. Not part of the engine's named button set.
    pub const SCOREBOARD: Self = Self(1 << 33);
    /// Inspect key. Not part of the engine's named button set.
    pub const INSPECT: Self = Self(1 << 35);

    /// Button used when a configured name cannot be resolved.
    pub const DEFAULT_ACTIVATION: Self = Self::INSPECT;

    const NAMED: [(&'static str, Self); 27] = [
        ("Attack", Self::ATTACK),
        ("Jump", Self::JUMP),
        ("Duck", Self::DUCK),
        ("Forward", Self::FORWARD),
        ("Back", Self::BACK),
        ("Use", Self::USE),
        ("Cancel", Self::CANCEL),
        ("Left", Self::LEFT),
        ("Right", Self::RIGHT),
        ("Moveleft", Self::MOVELEFT),
        ("Moveright", Self::MOVERIGHT),
        ("Attack2", Self::ATTACK2),
        ("Run", Self::RUN),
        ("Reload", Self::RELOAD),
        ("Alt1", Self::ALT1),
        ("Alt2", Self::ALT2),
        ("Speed", Self::SPEED),
        ("Walk", Self::WALK),
        ("Zoom", Self::ZOOM),
        ("Weapon1", Self::WEAPON1),
        ("Weapon2", Self::WEAPON2),
        ("Bullrush", Self::BULLRUSH),
        ("Grenade1", Self::GRENADE1),
        ("Grenade2", Self::GRENADE2),
        ("Attack3", Self::ATTACK3),
        ("Scoreboard", Self::SCOREBOARD),
        ("Inspect", Self::INSPECT),
    ];

    /// Resolve a button mask from a name, case-insensitively.
    ///
    /// Also accepts a raw decimal mask (`"32"`) and comma-joined parts
    /// (`"Use, Reload"`), which combine into one mask that must be held in
    /// full. Returns `None` if any part is unknown or the mask is empty.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let mut mask = Self::NONE;
        for part in name.split(',') {
            mask |= Self::from_part(part.trim())?;
        }
        (!mask.is_empty()).then_some(mask)
    }

    fn from_part(part: &str) -> Option<Self> {
        if let Ok(raw) = part.parse::<u64>() {
            return Some(Self(raw));
        }
        Self::NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(part))
            .map(|(_, b)| *b)
    }

    /// Returns true if `self` contains all bits in `other`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no button bits are set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Buttons {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Buttons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// ── ActivationInput ─────────────────────────────────────────────────

/// Which input, if any, toggles the flashlight automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationInput {
    /// Only explicit commands toggle.
    Disabled,
    /// Rising edge of this button toggles.
    Button(Buttons),
}

impl ActivationInput {
    /// Resolve from the configured detection flag and button name.
    ///
    /// `"none"` (any case) or an empty name disables detection. Anything
    /// [`Buttons::from_name`] rejects falls back to
    /// [`Buttons::DEFAULT_ACTIVATION`] with a warning.
    #[must_use]
    pub fn resolve(detect: bool, name: &str) -> Self {
        if !detect {
            return Self::Disabled;
        }
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Self::Disabled;
        }
        match Buttons::from_name(trimmed) {
            Some(button) => Self::Button(button),
            None => {
                warn!("Invalid button name '{trimmed}', falling back to Inspect");
                Self::Button(Buttons::DEFAULT_ACTIVATION)
            }
        }
    }

    /// Whether the activation button is held in `held`.
    #[must_use]
    pub fn is_held(self, held: Buttons) -> bool {
        match self {
            Self::Disabled => false,
            Self::Button(button) => held.contains(button),
        }
    }
}
