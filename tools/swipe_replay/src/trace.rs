use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use multiswipe::{types::MAX_FRAME_POINTERS, FrameAction, FrameSnapshot, Point, PointerId};

pub const TRACE_HEADER: &str = "swipe_trace,ms,action,count,pointers";

/// Reads a `swipe_trace` capture. Lines with another leading tag are ignored
/// so raw device logs can be replayed without filtering.
pub fn parse_trace(path: &Path) -> Result<Vec<FrameSnapshot>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read trace {}", path.display()))?;
    parse_trace_str(&raw).with_context(|| format!("invalid trace {}", path.display()))
}

pub fn parse_trace_str(raw: &str) -> Result<Vec<FrameSnapshot>> {
    let mut frames = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == TRACE_HEADER {
            continue;
        }

        let parts: Vec<&str> = trimmed.splitn(5, ',').map(str::trim).collect();
        if parts[0] != "swipe_trace" {
            continue;
        }
        if parts.len() < 4 {
            bail!("line {line_no}: expected at least 4 columns");
        }

        let time_ms = parts[1]
            .parse::<u64>()
            .map_err(|e| anyhow!("line {line_no}: invalid ms '{}': {e}", parts[1]))?;
        let action = parse_action(parts[2])
            .ok_or_else(|| anyhow!("line {line_no}: unknown action '{}'", parts[2]))?;
        let count = parts[3]
            .parse::<usize>()
            .map_err(|e| anyhow!("line {line_no}: invalid count '{}': {e}", parts[3]))?;

        let mut frame = FrameSnapshot::new(action, time_ms);
        let mut listed = 0usize;
        for token in parts.get(4).copied().unwrap_or("").split_whitespace() {
            let (id, point) = parse_pointer(token)
                .ok_or_else(|| anyhow!("line {line_no}: invalid pointer '{token}'"))?;
            if !frame.push_pointer(id, point) {
                bail!("line {line_no}: more than {MAX_FRAME_POINTERS} pointers");
            }
            listed += 1;
        }
        if count < listed {
            bail!("line {line_no}: count {count} is below the {listed} listed pointers");
        }

        frames.push(frame.with_pointer_count(count));
    }

    Ok(frames)
}

/// Expected result labels, one per line.
pub fn parse_expected_labels(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read expectations {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_ascii_lowercase())
        .collect())
}

fn parse_action(raw: &str) -> Option<FrameAction> {
    match raw.to_ascii_lowercase().as_str() {
        "down" => Some(FrameAction::Down),
        "pointer_down" => Some(FrameAction::PointerAdded),
        "move" => Some(FrameAction::Move),
        "pointer_up" => Some(FrameAction::PointerRemoved),
        "up" => Some(FrameAction::Up),
        "cancel" => Some(FrameAction::Cancel),
        _ => None,
    }
}

fn parse_pointer(token: &str) -> Option<(PointerId, Point)> {
    let mut fields = token.split(':');
    let id = fields.next()?.parse::<PointerId>().ok()?;
    let x = fields.next()?.parse::<f32>().ok()?;
    let y = fields.next()?.parse::<f32>().ok()?;
    if fields.next().is_some() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((id, Point::new(x, y)))
}
