//! Line-oriented command channel and reply/event formatting.
//!
//! The frontend sends one command per line; every text reply is followed
//! by a line containing exactly `END` and a flush. The binary book dump is
//! the one reply with no terminator. Execution and ticker events go to a
//! separate stream (stderr in the shipped binary), each preceded by a
//! routing header line and also `END`-terminated.

use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde_json::json;
use tracing::trace;

use crate::engine::{Engine, ExecutionEvent, OrderRequest, OrderView, TickerEvent};

/// A decoded command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Order(OrderRequest),
    Cancel(i64),
    Status(i64),
    StatusAll(i64),
    Quote,
    OrderbookBinary,
    AccountFromId(i64),
    Scores,
    DebugMemory,
    Timestamp,
    /// Anything that is not a known command word, including a blank line.
    Unknown,
}

impl Command {
    /// Split a line on whitespace and decode it. Missing numeric tokens
    /// decode as 0, the same way atoi treats an empty token.
    #[must_use]
    pub fn parse(line: &str) -> Command {
        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else {
            return Command::Unknown;
        };
        let mut int_token = |tokens: &mut std::str::SplitWhitespace<'_>| {
            parse_int(tokens.next().unwrap_or(""))
        };
        match word {
            "ORDER" => {
                let account = tokens.next().unwrap_or("").to_string();
                Command::Order(OrderRequest {
                    account,
                    account_id: int_token(&mut tokens),
                    qty: int_token(&mut tokens),
                    price: int_token(&mut tokens),
                    direction: int_token(&mut tokens),
                    order_type: int_token(&mut tokens),
                })
            }
            "CANCEL" => Command::Cancel(int_token(&mut tokens)),
            "STATUS" => Command::Status(int_token(&mut tokens)),
            "STATUSALL" => Command::StatusAll(int_token(&mut tokens)),
            "QUOTE" => Command::Quote,
            "ORDERBOOK_BINARY" => Command::OrderbookBinary,
            "__ACC_FROM_ID__" => Command::AccountFromId(int_token(&mut tokens)),
            "__SCORES__" => Command::Scores,
            "__DEBUG_MEMORY__" => Command::DebugMemory,
            "__TIMESTAMP__" => Command::Timestamp,
            _ => Command::Unknown,
        }
    }
}

/// atoi-shaped token decoding: optional sign, then leading digits;
/// anything else yields 0, and out-of-range values saturate at the 32-bit
/// bounds the wire contract assumes.
fn parse_int(token: &str) -> i64 {
    let bytes = token.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    let mut value: i64 = 0;
    let mut seen = false;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'))
            .min(i64::from(i32::MAX) + 1);
    }
    if !seen {
        return 0;
    }
    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX))
}

#[derive(Serialize)]
struct AccountOrdersReply<'a> {
    ok: bool,
    venue: &'a str,
    orders: Vec<OrderView>,
}

/// Drive the engine from a command stream until EOF.
///
/// Commands are processed strictly one at a time; all side effects of a
/// command (including its events) land before the next line is read. EOF
/// is reported on the reply stream as an error, after which the caller
/// should exit with status 1.
///
/// # Errors
/// Only write failures on the reply stream surface as errors; read
/// failures are treated as EOF.
pub fn serve<R: BufRead, W: Write>(engine: &mut Engine, input: R, mut output: W) -> io::Result<()> {
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        dispatch(engine, &line, &mut output)?;
    }
    write_compact(
        &mut output,
        &json!({"ok": false, "error": "Unexpected EOF on stdin. Quitting."}),
    )?;
    end_message(&mut output)
}

/// Execute one command line and write its reply.
///
/// # Errors
/// Propagates write failures on the reply stream.
pub fn dispatch<W: Write>(engine: &mut Engine, line: &str, output: &mut W) -> io::Result<()> {
    let command = Command::parse(line);
    trace!(?command, "dispatch");
    match command {
        Command::Order(request) => {
            match engine.place_order(&request) {
                Ok(id) => {
                    let view = engine.order_view(id).expect("placed order has a view");
                    write_pretty(output, &view)?;
                }
                Err(error) => {
                    let code = error.backend_code().unwrap_or(0);
                    let message = format!(
                        "Backend error {code} (account = {}, account_int = {}, qty = {}, \
                         price = {}, direction = {}, orderType = {})",
                        request.account,
                        request.account_id,
                        request.qty,
                        request.price,
                        request.direction,
                        request.order_type
                    );
                    write_compact(output, &json!({"ok": false, "error": message}))?;
                }
            }
            end_message(output)
        }
        Command::Cancel(id) => {
            match engine.cancel_order(id) {
                Ok(order_id) => {
                    let view = engine
                        .order_view(order_id)
                        .expect("cancelled order has a view");
                    write_pretty(output, &view)?;
                }
                Err(_) => write_compact(output, &json!({"ok": false, "error": "No such ID"}))?,
            }
            end_message(output)
        }
        Command::Status(id) => {
            match engine.order_status(id) {
                Ok(view) => write_pretty(output, &view)?,
                Err(_) => write_compact(output, &json!({"ok": false, "error": "No such ID"}))?,
            }
            end_message(output)
        }
        Command::StatusAll(account_id) => {
            match engine.account_orders(account_id) {
                Ok(orders) => {
                    let reply = AccountOrdersReply {
                        ok: true,
                        venue: engine.venue(),
                        orders,
                    };
                    write_pretty(output, &reply)?;
                }
                Err(_) => write_compact(
                    output,
                    &json!({"ok": false, "error": "Account not known on this book"}),
                )?,
            }
            end_message(output)
        }
        Command::Quote => {
            write_pretty(output, &engine.quote_view())?;
            end_message(output)
        }
        Command::OrderbookBinary => {
            // No END line after binary data, just the flush.
            output.write_all(&engine.book_snapshot().to_bytes())?;
            output.flush()
        }
        Command::AccountFromId(id) => {
            match engine.account_name_for(id) {
                Ok(name) => write!(output, "OK {name}")?,
                Err(_) => write!(output, "ERROR None")?,
            }
            end_message(output)
        }
        Command::Scores => {
            let html = engine.scores_html();
            output.write_all(html.as_bytes())?;
            end_message(output)
        }
        Command::DebugMemory => {
            write!(output, "{}", engine.counters())?;
            end_message(output)
        }
        Command::Timestamp => {
            let ts = engine.timestamp();
            output.write_all(ts.as_bytes())?;
            end_message(output)
        }
        Command::Unknown => {
            write_compact(output, &json!({"ok": false, "error": "Did not comprehend"}))?;
            end_message(output)
        }
    }
}

/// Write an execution event to the event stream: routing header, pretty
/// JSON body, `END`.
///
/// # Errors
/// Propagates write failures; callers on the live event stream drop them.
pub fn write_execution<W: Write>(writer: &mut W, event: &ExecutionEvent) -> io::Result<()> {
    writeln!(
        writer,
        "EXECUTION {} {} {}",
        event.account, event.venue, event.symbol
    )?;
    serde_json::to_writer_pretty(&mut *writer, event)?;
    writer.write_all(b"\nEND\n")?;
    writer.flush()
}

/// Write a ticker event to the event stream. Tickers are not addressed to
/// any account, so the header's account field is `NONE`.
///
/// # Errors
/// Propagates write failures; callers on the live event stream drop them.
pub fn write_ticker<W: Write>(writer: &mut W, event: &TickerEvent) -> io::Result<()> {
    writeln!(
        writer,
        "TICKER NONE {} {}",
        event.quote.venue, event.quote.symbol
    )?;
    serde_json::to_writer_pretty(&mut *writer, event)?;
    writer.write_all(b"\nEND\n")?;
    writer.flush()
}

fn write_pretty<W: Write, T: Serialize>(output: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *output, value)?;
    Ok(())
}

fn write_compact<W: Write, T: Serialize>(output: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *output, value)?;
    Ok(())
}

fn end_message<W: Write>(output: &mut W) -> io::Result<()> {
    output.write_all(b"\nEND\n")?;
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_is_atoi_shaped() {
        assert_eq!(parse_int("123"), 123);
        assert_eq!(parse_int("-45"), -45);
        assert_eq!(parse_int("+7"), 7);
        assert_eq!(parse_int("99abc"), 99);
        assert_eq!(parse_int("abc"), 0);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("99999999999"), i64::from(i32::MAX));
        assert_eq!(parse_int("-99999999999"), i64::from(i32::MIN));
    }

    #[test]
    fn order_lines_decode_positionally() {
        let command = Command::parse("ORDER CES134127 5 100 5000 1 3");
        let Command::Order(request) = command else {
            panic!("expected an order");
        };
        assert_eq!(request.account, "CES134127");
        assert_eq!(request.account_id, 5);
        assert_eq!(request.qty, 100);
        assert_eq!(request.price, 5000);
        assert_eq!(request.direction, 1);
        assert_eq!(request.order_type, 3);
    }

    #[test]
    fn missing_tokens_decode_as_zero_or_empty() {
        let Command::Order(request) = Command::parse("ORDER") else {
            panic!("expected an order");
        };
        assert_eq!(request.account, "");
        assert_eq!(request.qty, 0);

        assert_eq!(Command::parse("CANCEL"), Command::Cancel(0));
        assert_eq!(Command::parse("STATUS xyz"), Command::Status(0));
    }

    #[test]
    fn unknown_words_and_blank_lines_do_not_parse() {
        assert_eq!(Command::parse("HELLO"), Command::Unknown);
        assert_eq!(Command::parse(""), Command::Unknown);
        assert_eq!(Command::parse("   "), Command::Unknown);
        assert_eq!(Command::parse("order A 0 1 1 1 1"), Command::Unknown);
    }
}
