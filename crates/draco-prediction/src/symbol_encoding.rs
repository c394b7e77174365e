use crate::status::{invalid_parameter, Status};

/// Zig-zag maps a signed value onto the unsigned symbols the entropy coder
/// consumes: `0, -1, 1, -2, ...` become `0, 1, 2, 3, ...`.
pub fn convert_signed_int_to_symbol(val: i32) -> u32 {
    if val >= 0 {
        (val as u32) << 1
    } else {
        // -(val + 1) cannot overflow, even for i32::MIN.
        (((-(val + 1)) as u32) << 1) | 1
    }
}

pub fn convert_symbol_to_signed_int(symbol: u32) -> i32 {
    let magnitude = (symbol >> 1) as i32;
    if symbol & 1 == 0 {
        magnitude
    } else {
        -magnitude - 1
    }
}

fn check_lengths(in_len: usize, out_len: usize) -> Status {
    if out_len < in_len {
        return Err(invalid_parameter(format!(
            "output holds {} symbols, need {}",
            out_len, in_len
        )));
    }
    Ok(())
}

pub fn convert_signed_ints_to_symbols(in_values: &[i32], out_symbols: &mut [u32]) -> Status {
    check_lengths(in_values.len(), out_symbols.len())?;
    for (out, &val) in out_symbols.iter_mut().zip(in_values) {
        *out = convert_signed_int_to_symbol(val);
    }
    Ok(())
}

pub fn convert_symbols_to_signed_ints(in_symbols: &[u32], out_values: &mut [i32]) -> Status {
    check_lengths(in_symbols.len(), out_values.len())?;
    for (out, &symbol) in out_values.iter_mut().zip(in_symbols) {
        *out = convert_symbol_to_signed_int(symbol);
    }
    Ok(())
}

/// Converts transform corrections to entropy symbols. Corrections that are
/// known to be non-negative are passed through unchanged.
pub fn corrections_to_symbols(
    corrections: &[i32],
    corrections_positive: bool,
    out_symbols: &mut [u32],
) -> Status {
    if !corrections_positive {
        return convert_signed_ints_to_symbols(corrections, out_symbols);
    }
    check_lengths(corrections.len(), out_symbols.len())?;
    for (out, &corr) in out_symbols.iter_mut().zip(corrections) {
        if corr < 0 {
            return Err(invalid_parameter(format!(
                "negative correction {} in a positive stream",
                corr
            )));
        }
        *out = corr as u32;
    }
    Ok(())
}

pub fn symbols_to_corrections(
    symbols: &[u32],
    corrections_positive: bool,
    out_corrections: &mut [i32],
) -> Status {
    if !corrections_positive {
        return convert_symbols_to_signed_ints(symbols, out_corrections);
    }
    check_lengths(symbols.len(), out_corrections.len())?;
    for (out, &symbol) in out_corrections.iter_mut().zip(symbols) {
        *out = i32::try_from(symbol)
            .map_err(|_| invalid_parameter(format!("symbol {} exceeds i32", symbol)))?;
    }
    Ok(())
}
