//! Reader for tag family sources in the upstream AprilTag C layout
//! (`tagStandard52h13.c` and friends): one `codedata[]` initializer plus
//! `tf->field = value;` assignments.
//!
//! Kept free of crate dependencies: the build script compiles this file too.

use crate::geometry::{bit_order, standard_cell};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CSourceFamily {
    pub name: String,
    pub min_hamming: u32,
    pub total_width: usize,
    pub codes: Vec<u64>,
}

fn parse_code(token: &str) -> Result<u64, String> {
    let digits = token.trim_end_matches(['u', 'U', 'l', 'L']);
    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse::<u64>(),
    };
    parsed.map_err(|_| format!("invalid code literal {token:?}"))
}

fn parse_codes(src: &str) -> Result<Vec<u64>, String> {
    let start = src
        .find("codedata")
        .ok_or_else(|| "missing codedata[] table".to_string())?;
    let body = &src[start..];
    let open = body
        .find('{')
        .ok_or_else(|| "codedata[] has no initializer".to_string())?;
    let close = body[open..]
        .find('}')
        .map(|p| p + open)
        .ok_or_else(|| "codedata[] initializer is not closed".to_string())?;
    body[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(parse_code)
        .collect()
}

/// Parse an upstream family source.
///
/// Only standard layouts are accepted; when the source lists `bit_x`/`bit_y`
/// they must describe the standard bit order.
pub(crate) fn parse_family_source(src: &str) -> Result<CSourceFamily, String> {
    let fields: HashMap<&str, &str> = src
        .lines()
        .filter_map(|line| {
            let (lhs, rhs) = line.trim().strip_prefix("tf->")?.split_once('=')?;
            Some((lhs.trim(), rhs.trim().trim_end_matches(';').trim()))
        })
        .collect();
    let field = |key: &str| {
        fields
            .get(key)
            .copied()
            .ok_or_else(|| format!("missing tf->{key}"))
    };
    let number = |key: &str| -> Result<i64, String> {
        let raw = field(key)?;
        raw.parse::<i64>()
            .map_err(|_| format!("tf->{key} is not an integer: {raw:?}"))
    };
    let count = |key: &str| -> Result<usize, String> {
        usize::try_from(number(key)?).map_err(|_| format!("tf->{key} is negative"))
    };

    let raw_name = field("name")?;
    let name = match (raw_name.find('"'), raw_name.rfind('"')) {
        (Some(s), Some(e)) if e > s => raw_name[s + 1..e].to_string(),
        _ => return Err(format!("tf->name has no string literal: {raw_name:?}")),
    };
    let min_hamming =
        u32::try_from(number("h")?).map_err(|_| "tf->h is out of range".to_string())?;
    let total_width = count("total_width")?;
    if total_width == 0 {
        return Err(format!("{name}: total_width is 0"));
    }

    let codes = parse_codes(src)?;
    let ncodes = count("ncodes")?;
    if codes.len() != ncodes {
        return Err(format!(
            "{name}: ncodes is {ncodes} but codedata[] has {} entries",
            codes.len()
        ));
    }

    let expected = bit_order(total_width, |x, y| standard_cell(total_width, x, y) == 'd');
    let nbits = count("nbits")?;
    if nbits != expected.len() {
        return Err(format!(
            "{name}: {nbits} bits do not fit the standard {total_width}x{total_width} layout"
        ));
    }

    if fields.contains_key("bit_x[0]") {
        // stored as uint32_t, so negative offsets may be written wrapped
        let coord = |key: String| -> Result<i64, String> {
            let v = number(&key)?;
            Ok(if (0..=i64::from(u32::MAX)).contains(&v) {
                i64::from(v as u32 as i32)
            } else {
                v
            })
        };
        let mut bits = Vec::with_capacity(nbits);
        for i in 0..nbits {
            bits.push((coord(format!("bit_x[{i}]"))?, coord(format!("bit_y[{i}]"))?));
        }
        // bit positions are relative to the border; cell (0, 0) is a data cell
        let origin = bits.iter().flat_map(|&(x, y)| [x, y]).min().unwrap_or(0);
        let cells: Vec<(usize, usize)> = bits
            .iter()
            .map(|&(x, y)| ((x - origin) as usize, (y - origin) as usize))
            .collect();
        if cells != expected {
            return Err(format!(
                "{name}: bit positions do not follow the standard layout"
            ));
        }
    }

    Ok(CSourceFamily {
        name,
        min_hamming,
        total_width,
        codes,
    })
}
