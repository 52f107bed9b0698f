use jobwrap_utils::LineRing;
use jobwrap_utils::ring_buffer::MAX_RETAINED_LINE_BYTES;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

// Room for a trailing "\r\n" on a line that is exactly at the retention cap.
const LINE_BUFFER_CAP: usize = MAX_RETAINED_LINE_BYTES + 2;

/// Read the whole of stdout.
pub(crate) async fn collect_stdout<R>(mut pipe: R) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut stdout = Vec::new();
    pipe.read_to_end(&mut stdout).await?;
    Ok(stdout)
}

/// Copy stderr to `sink` as it arrives and record each line in `lines`.
///
/// Memory held for the current line is bounded even if the child never
/// writes a newline. A final line without a newline still counts. Returns the
/// number of lines seen.
pub(crate) async fn forward_stderr<R, W>(
    pipe: R,
    lines: &mut LineRing,
    sink: &mut W,
) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
    W: Write + ?Sized,
{
    let mut reader = BufReader::new(pipe);
    let mut current: Vec<u8> = Vec::new();
    let mut seen = 0usize;
    let mut sink_ok = true;

    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            break;
        }

        let (consumed, line_done) = match chunk.iter().position(|&b| b == b'\n') {
            Some(idx) => (idx + 1, true),
            None => (chunk.len(), false),
        };
        let piece = &chunk[..consumed];

        if sink_ok && let Err(err) = sink.write_all(piece) {
            tracing::debug!(error = %err, "stderr passthrough stopped");
            sink_ok = false;
        }

        let room = LINE_BUFFER_CAP.saturating_sub(current.len());
        current.extend_from_slice(&piece[..piece.len().min(room)]);
        reader.consume(consumed);

        if line_done {
            lines.push(std::mem::take(&mut current));
            seen += 1;
        }
    }

    if !current.is_empty() {
        lines.push(current);
        seen += 1;
    }

    if sink_ok {
        let _ = sink.flush();
    }

    Ok(seen)
}
