/// A logical movement key, after window-system keycodes have been mapped
/// through the fixed binding table (W/Up = forward, S/Down = backward,
/// A/Left = left, D/Right = right, Space = jump, Shift = sprint,
/// E = interact). The app layer owns that mapping; everything below it
/// speaks only in these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementKey {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Sprint,
    Interact,
}

impl std::str::FromStr for MovementKey {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "jump" => Ok(Self::Jump),
            "sprint" => Ok(Self::Sprint),
            "interact" => Ok(Self::Interact),
            other => Err(ScriptError::UnknownKey(other.to_owned())),
        }
    }
}

/// The per-frame movement input record the controller reads.
///
/// `interact` is captured like the rest but no handler consumes it yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    pub interact: bool,
}

impl MovementFlags {
    /// Record a key transition.
    pub fn apply(&mut self, key: MovementKey, pressed: bool) {
        match key {
            MovementKey::Forward => self.forward = pressed,
            MovementKey::Backward => self.backward = pressed,
            MovementKey::Left => self.left = pressed,
            MovementKey::Right => self.right = pressed,
            MovementKey::Jump => self.jump = pressed,
            MovementKey::Sprint => self.sprint = pressed,
            MovementKey::Interact => self.interact = pressed,
        }
    }

    /// True when no directional key is held.
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }

    /// Release everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Errors from movement-script parsing.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown movement key {0:?}")]
    UnknownKey(String),
    #[error("bad tick count in {0:?}")]
    BadTickCount(String),
}

/// One parsed script step: the flags to hold, and for how many ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    pub flags: MovementFlags,
    pub ticks: u32,
}

/// Parse a headless movement script: comma-separated `keys*ticks` tokens,
/// where `keys` is one or more logical keys joined by `+`, e.g.
/// `forward+sprint*120, jump*1, backward+right*60`. A bare token means one
/// tick.
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for token in script.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (keys, ticks) = match token.split_once('*') {
            Some((keys, count)) => {
                let ticks = count
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ScriptError::BadTickCount(token.to_owned()))?;
                (keys.trim(), ticks)
            }
            None => (token, 1),
        };

        let mut flags = MovementFlags::default();
        for key in keys.split('+') {
            flags.apply(key.trim().parse()?, true);
        }
        steps.push(ScriptStep { flags, ticks });
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_start_clear() {
        let flags = MovementFlags::default();
        assert!(flags.is_idle());
        assert!(!flags.jump);
    }

    #[test]
    fn apply_sets_and_releases() {
        let mut flags = MovementFlags::default();
        flags.apply(MovementKey::Forward, true);
        flags.apply(MovementKey::Sprint, true);
        assert!(flags.forward);
        assert!(flags.sprint);
        assert!(!flags.is_idle());

        flags.apply(MovementKey::Forward, false);
        assert!(!flags.forward);
        assert!(flags.is_idle());
    }

    #[test]
    fn interact_is_captured() {
        let mut flags = MovementFlags::default();
        flags.apply(MovementKey::Interact, true);
        assert!(flags.interact);
        // interact is not a directional key
        assert!(flags.is_idle());
    }

    #[test]
    fn parse_simple_script() {
        let steps = parse_script("forward*120, jump*1,backward*30").unwrap();
        assert_eq!(steps.len(), 3);
        assert!(steps[0].flags.forward);
        assert_eq!(steps[0].ticks, 120);
        assert!(steps[1].flags.jump);
        assert_eq!(steps[1].ticks, 1);
        assert!(steps[2].flags.backward);
        assert_eq!(steps[2].ticks, 30);
    }

    #[test]
    fn chords_hold_several_keys_at_once() {
        let steps = parse_script("backward+right+sprint*60").unwrap();
        assert_eq!(steps.len(), 1);
        let flags = steps[0].flags;
        assert!(flags.backward && flags.right && flags.sprint);
        assert!(!flags.forward && !flags.left);
    }

    #[test]
    fn bare_key_means_one_tick() {
        let steps = parse_script("jump").unwrap();
        assert_eq!(steps.len(), 1);
        assert!(steps[0].flags.jump);
        assert_eq!(steps[0].ticks, 1);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = parse_script("strafe*10").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownKey(_)));
    }

    #[test]
    fn bad_tick_count_is_rejected() {
        let err = parse_script("forward*lots").unwrap_err();
        assert!(matches!(err, ScriptError::BadTickCount(_)));
    }
}
