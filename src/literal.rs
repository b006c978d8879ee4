//! Parsing shared by the literal pool (`=C'...'`, `=X'...'`, `=5`) and the
//! `BYTE` directive's character/hex constant forms.

/// A literal or `BYTE` constant, reduced to its object-code hex digits and
/// byte length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConstant {
    pub hex: String,
    pub length: usize,
}

fn strip_quoted(text: &str, prefix: char) -> Option<&str> {
    let rest = text.strip_prefix(prefix)?;
    let rest = rest.strip_prefix('\'')?;
    rest.strip_suffix('\'')
}

/// Parse a `C'...'` or `X'...'` constant body (used by `BYTE`, which does not
/// accept a plain-decimal form).
pub fn parse_char_or_hex(text: &str) -> Result<ParsedConstant, String> {
    if let Some(body) = strip_quoted(text, 'C') {
        let hex: String = body.bytes().map(|b| format!("{b:02X}")).collect();
        Ok(ParsedConstant {
            length: body.len(),
            hex,
        })
    } else if let Some(body) = strip_quoted(text, 'X') {
        parse_hex_body(body)
    } else {
        Err(format!("invalid BYTE constant '{text}'"))
    }
}

/// Parse any literal pool form: `C'...'`, `X'...'`, or a plain decimal
/// integer. `text` excludes the leading `=`.
pub fn parse_literal(text: &str) -> Result<ParsedConstant, String> {
    if let Some(body) = strip_quoted(text, 'C') {
        let hex: String = body.bytes().map(|b| format!("{b:02X}")).collect();
        Ok(ParsedConstant {
            length: body.len(),
            hex,
        })
    } else if let Some(body) = strip_quoted(text, 'X') {
        parse_hex_body(body)
    } else if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        let value: i64 = text
            .parse()
            .map_err(|_| format!("invalid decimal literal '{text}'"))?;
        let masked = (value as u32) & 0x00FF_FFFF;
        Ok(ParsedConstant {
            length: 3,
            hex: format!("{masked:06X}"),
        })
    } else {
        Err(format!("invalid literal '{text}'"))
    }
}

fn parse_hex_body(body: &str) -> Result<ParsedConstant, String> {
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex constant 'X'{body}''"));
    }
    let length = (body.len() + 1) / 2;
    let hex = if body.len() % 2 == 1 {
        format!("0{body}")
    } else {
        body.to_string()
    };
    Ok(ParsedConstant {
        length,
        hex: hex.to_ascii_uppercase(),
    })
}
