//! Stage-display wire format.
//!
//! Every frame is a JSON object tagged by its `acn` field:
//!
//! | `acn` | Direction | Meaning |
//! |-------|-----------|---------|
//! | `ath` | both | authentication request / result (`ath`, `err`) |
//! | `fv` | in | frame value: a batch of items in `ary` |
//! | `cs` | in | current slide, text in `txt` |
//!
//! Other actions (next slide, notes, clocks, timers, messages) are ignored.

use serde::{Deserialize, Serialize};

const ACN_AUTH: &str = "ath";
const ACN_FRAME_VALUE: &str = "fv";
const ACN_CURRENT_SLIDE: &str = "cs";

#[derive(Serialize)]
struct AuthRequest<'a> {
    pwd: &'a str,
    ptl: u32,
    acn: &'static str,
}

#[derive(Deserialize)]
struct Frame {
    acn: String,
    #[serde(default)]
    ath: Option<bool>,
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    txt: Option<String>,
    #[serde(default)]
    ary: Vec<Frame>,
}

/// A decoded inbound item we care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Authentication result; `Err` carries ProPresenter's message.
    Auth(Result<(), String>),
    /// The current slide changed.
    CurrentSlide(Option<String>),
}

/// Serialise the authentication request sent right after connecting.
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn auth_request(password: &str, protocol: u32) -> Result<String, serde_json::Error> {
    serde_json::to_string(&AuthRequest {
        pwd: password,
        ptl: protocol,
        acn: ACN_AUTH,
    })
}

/// Decode one text frame into the items it carries, in order.
///
/// # Errors
///
/// Returns an error when the frame is not a JSON object with an `acn` field.
pub fn parse_frame(raw: &str) -> Result<Vec<Inbound>, serde_json::Error> {
    let frame: Frame = serde_json::from_str(raw)?;
    let mut items = Vec::new();
    collect(frame, &mut items);
    Ok(items)
}

fn collect(frame: Frame, items: &mut Vec<Inbound>) {
    match frame.acn.as_str() {
        ACN_AUTH => {
            let result = if frame.ath == Some(true) {
                Ok(())
            } else {
                Err(frame
                    .err
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "password rejected".to_string()))
            };
            items.push(Inbound::Auth(result));
        }
        ACN_CURRENT_SLIDE => items.push(Inbound::CurrentSlide(frame.txt)),
        ACN_FRAME_VALUE => {
            for item in frame.ary {
                collect(item, items);
            }
        }
        _ => {}
    }
}
