//! Scripted key input fed to the session one player turn at a time.

use std::{collections::VecDeque, str::FromStr};

use anyhow::{bail, Result};
use rol_core::Key;

/// Queue of key chords; each chord is held down for one player turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct KeyScript {
    turns: VecDeque<Vec<Key>>,
}

impl KeyScript {
    /// Keys to press for the next player turn, if the script has any left.
    pub(crate) fn next_turn(&mut self) -> Option<Vec<Key>> {
        self.turns.pop_front()
    }
}

impl FromStr for KeyScript {
    type Err = anyhow::Error;

    /// Parses turns separated by commas; keys pressed together are joined
    /// with `+`, e.g. `right,right,down+fire`.
    fn from_str(source: &str) -> Result<Self> {
        let mut turns = VecDeque::new();
        for turn in source.split(',').map(str::trim).filter(|turn| !turn.is_empty()) {
            let keys = turn
                .split('+')
                .map(|name| parse_key(name.trim()))
                .collect::<Result<Vec<_>>>()?;
            turns.push_back(keys);
        }
        Ok(Self { turns })
    }
}

fn parse_key(name: &str) -> Result<Key> {
    let key = match name.to_ascii_lowercase().as_str() {
        "up" | "u" => Key::Up,
        "down" | "d" => Key::Down,
        "left" | "l" => Key::Left,
        "right" | "r" => Key::Right,
        "fire" | "space" | "f" => Key::Fire,
        other => bail!("unknown key `{other}`"),
    };
    Ok(key)
}
