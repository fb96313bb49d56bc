use log::info;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

const IMAGES_PREFIX: &str = "IMAGES: ";
const FINISHED_PREFIX: &str = "FINISHED";

/// What the client learned from one build session.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Image list announced by the server, in build order.
    pub images: Vec<String>,
    /// Number of `FINISHED` summary lines received.
    pub finished: usize,
}

/// Drives one build session over an established stream.
///
/// Sends the trigger message, then consumes newline-delimited lines:
/// the `IMAGES: ` announcement fixes the set of expected summaries, and
/// the session ends once one `FINISHED` line per image has arrived or
/// the server closes the connection, whichever comes first.
pub async fn run_session<S>(stream: S) -> Result<BuildReport, std::io::Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(stream);
    stream.get_mut().write_all(b"I am client!\n").await?;
    stream.get_mut().flush().await?;

    let mut report = BuildReport::default();
    let mut expected: Option<usize> = None;
    let mut line = String::new();

    loop {
        line.clear();
        let n = stream.read_line(&mut line).await?;
        if n == 0 {
            // Server closed the connection; authoritative end-of-stream.
            break;
        }
        let line = line.trim_end();
        info!("DATA: {}", line);

        if let Some(rest) = line.strip_prefix(IMAGES_PREFIX) {
            report.images = rest
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
            expected = Some(report.images.len());
        } else if line == IMAGES_PREFIX.trim_end() {
            // Empty image list: the announcement is "IMAGES: " with
            // nothing after the prefix, trimmed down to "IMAGES:".
            report.images = Vec::new();
            expected = Some(0);
        }

        if line.starts_with(FINISHED_PREFIX) {
            report.finished += 1;
        }

        if let Some(expected) = expected {
            if report.finished >= expected {
                break;
            }
        }
    }

    Ok(report)
}
