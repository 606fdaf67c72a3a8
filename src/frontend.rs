//! Terminal front-end: turns typed lines into UI events.
//!
//! | Line                 | Events                                   |
//! |----------------------|------------------------------------------|
//! | `/click <id>`        | click on `<id>`                          |
//! | `/key <id> <key>`    | key-down `<key>` on `<id>`               |
//! | `/submit <id>`       | submit of `<id>`                         |
//! | `/input <id> <text>` | `<id>`'s value set to `<text>`           |
//! | anything else        | typed into the profile's input and sent  |

use crate::bridge::DomEvent;
use crate::bridge::relays::lobby::SEND_KEY;
use crate::config::Profile;
use crate::dom::page::{CHAT_FORM, CHAT_INPUT, LOBBY_INPUT};
use crate::error::BridgeError;

/// Translates one input line into the UI events it stands for.
///
/// # Errors
///
/// Returns [`BridgeError::Config`] for a malformed command, or for plain
/// text under a profile that has no text input.
pub fn parse_line(profile: Profile, line: &str) -> Result<Vec<DomEvent>, BridgeError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(command) = line.strip_prefix('/') {
        return parse_command(command).map(|event| vec![event]);
    }
    match profile {
        Profile::Chat | Profile::All => Ok(vec![
            DomEvent::Input {
                target: CHAT_INPUT.into(),
                value: line.into(),
            },
            DomEvent::Submit {
                target: CHAT_FORM.into(),
            },
        ]),
        Profile::Lobby => Ok(vec![
            DomEvent::Input {
                target: LOBBY_INPUT.into(),
                value: line.into(),
            },
            DomEvent::KeyDown {
                target: LOBBY_INPUT.into(),
                key: SEND_KEY.into(),
            },
        ]),
        Profile::Board => Err(BridgeError::Config(
            "the board profile has no text input; use /click <cell-id>".into(),
        )),
    }
}

fn parse_command(command: &str) -> Result<DomEvent, BridgeError> {
    let mut words = command.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let target = words.next().map(str::to_string);
    let event = match (verb, target) {
        ("click", Some(target)) => DomEvent::Click { target },
        ("submit", Some(target)) => DomEvent::Submit { target },
        ("input", Some(target)) => {
            let value = command
                .splitn(3, char::is_whitespace)
                .nth(2)
                .unwrap_or_default();
            DomEvent::Input {
                target,
                value: value.to_string(),
            }
        }
        ("key", Some(target)) => {
            let key = words
                .next()
                .ok_or_else(|| BridgeError::Config("usage: /key <id> <key>".into()))?;
            DomEvent::KeyDown {
                target,
                key: key.to_string(),
            }
        }
        _ => {
            return Err(BridgeError::Config(format!("unknown command: /{command}")));
        }
    };
    Ok(event)
}
