use std::io::{self, Write};

use crate::services::github::{write_group_end, write_group_start};

/// Write the part of `full_content` not yet shown and return the new offset.
///
/// Offsets count characters. A log reported shorter than `previous_length`
/// is treated as having no new content. In group mode the closing marker
/// always starts its own line.
pub fn stream_log_delta<W: Write + ?Sized>(
    out: &mut W,
    image_name: &str,
    full_content: &str,
    previous_length: usize,
    use_groups: bool,
) -> io::Result<usize> {
    let start = match full_content.char_indices().nth(previous_length) {
        Some((index, _)) => index,
        None => return Ok(previous_length),
    };

    let delta = &full_content[start..];

    if use_groups {
        write_group_start(&mut *out, &format!("{} (log update)", image_name))?;
    }

    out.write_all(delta.as_bytes())?;
    out.flush()?;

    if use_groups {
        if !delta.ends_with('\n') {
            out.write_all(b"\n")?;
        }
        write_group_end(&mut *out)?;
    }

    Ok(previous_length + delta.chars().count())
}

/// Return the last `count` lines of `content`, ignoring surrounding blank space.
pub fn tail_lines(content: &str, count: usize) -> String {
    let lines: Vec<&str> = content.trim().lines().collect();
    let skip = lines.len().saturating_sub(count);
    lines[skip..].join("\n")
}
