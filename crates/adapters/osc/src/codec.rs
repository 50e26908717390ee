//! OSC 1.0 message encoder.
//!
//! Pure functions producing the bytes of a single OSC message, no socket
//! needed. A message is laid out as:
//!
//! | Part | Encoding |
//! |------|----------|
//! | Address | OSC-string (`/…`) |
//! | Type tags | OSC-string starting with `,` |
//! | Arguments | one payload per tag, big-endian |
//!
//! OSC-strings are NUL-terminated and zero-padded to a multiple of 4 bytes.
//!
//! | Argument | Tag | Payload |
//! |----------|-----|---------|
//! | string | `s` | OSC-string |
//! | integer fitting 32 bits | `i` | i32 |
//! | larger integer | `h` | i64 |
//! | float | `f` | f32 |
//! | `true` / `false` | `T` / `F` | none |

use slidelink_domain::command::Argument;

use crate::error::EncodeError;

/// Encode one OSC message.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidAddress`] when `address` does not start
/// with `/`, and [`EncodeError::NulInString`] when the address or a string
/// argument contains NUL.
pub fn encode_message(address: &str, arguments: &[Argument]) -> Result<Vec<u8>, EncodeError> {
    if !address.starts_with('/') {
        return Err(EncodeError::InvalidAddress(address.to_string()));
    }

    let mut tags = String::with_capacity(arguments.len() + 1);
    tags.push(',');
    let mut payload = Vec::new();

    for argument in arguments {
        match argument {
            Argument::Bool(true) => tags.push('T'),
            Argument::Bool(false) => tags.push('F'),
            Argument::Int(value) => match i32::try_from(*value) {
                Ok(small) => {
                    tags.push('i');
                    payload.extend_from_slice(&small.to_be_bytes());
                }
                Err(_) => {
                    tags.push('h');
                    payload.extend_from_slice(&value.to_be_bytes());
                }
            },
            Argument::Float(value) => {
                tags.push('f');
                #[allow(clippy::cast_possible_truncation)]
                let single = *value as f32;
                payload.extend_from_slice(&single.to_be_bytes());
            }
            Argument::String(value) => {
                tags.push('s');
                write_osc_string(&mut payload, value)?;
            }
        }
    }

    let mut packet =
        Vec::with_capacity(padded_len(address.len()) + padded_len(tags.len()) + payload.len());
    write_osc_string(&mut packet, address)?;
    write_osc_string(&mut packet, &tags)?;
    packet.extend_from_slice(&payload);
    Ok(packet)
}

/// Length of an OSC-string holding `len` bytes: terminator included, padded to 4.
fn padded_len(len: usize) -> usize {
    (len + 4) & !3
}

fn write_osc_string(buf: &mut Vec<u8>, value: &str) -> Result<(), EncodeError> {
    if value.contains('\0') {
        return Err(EncodeError::NulInString);
    }
    let start = buf.len();
    buf.extend_from_slice(value.as_bytes());
    buf.resize(start + padded_len(value.len()), 0);
    Ok(())
}
