use serde::{de::Deserializer, Deserialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use validator::Validate;

use crate::api::error;

/// Reads an explicit `null` as the type's default.
pub fn null_as_default<'de, T, D>(de: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// A form model that passed validation.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T: Validate> Validated<T> {
    pub fn new(model: T) -> Result<Self, error::SystemError> {
        model.validate()?;
        Ok(Validated(model))
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

fn is_absolute(path: &str) -> bool {
    path.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("http"))
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len()).is_some_and(|p| p.eq_ignore_ascii_case(prefix))
}

/// Makes a material file path absolute against the API origin.
pub fn normalize_file(origin: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || is_absolute(path) {
        return path.to_string();
    }
    let path = path.replace('\\', "/");
    let path = path.trim_start_matches('/');
    format!("{}/{}", origin.trim_end_matches('/'), path)
}

/// Like [`normalize_file`] but also guarantees an `/uploads/` prefix.
pub fn normalize_thumbnail(origin: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || is_absolute(path) {
        return path.to_string();
    }
    let path = path.replace('\\', "/");
    let path = if starts_with_ignore_case(&path, "/uploads/") {
        format!("/uploads/{}", &path["/uploads/".len()..])
    } else if starts_with_ignore_case(&path, "uploads/") {
        format!("/uploads/{}", &path["uploads/".len()..])
    } else {
        format!("/uploads/{}", path.trim_start_matches('/'))
    };
    format!("{}{}", origin.trim_end_matches('/'), path)
}

pub fn format_file_size(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut len = bytes.max(0) as f64;
    let mut order = 0;
    while len >= 1024.0 && order < UNITS.len() - 1 {
        order += 1;
        len /= 1024.0;
    }
    let rounded = format!("{len:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[order])
}

/// Whole-number percentage, rounded to nearest.
pub fn percentage(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (sent.min(total) as f64 * 100.0 / total as f64).round();
    pct as u8
}

/// Line-oriented interactive input. One reader is shared across prompts so
/// piped input is not lost between questions.
pub struct Prompt<R> {
    lines: Lines<R>,
}

impl Prompt<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Prompt::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Prompt { lines: reader.lines() }
    }

    /// Prints `label` on stderr and reads one trimmed line.
    pub async fn ask(&mut self, label: &str) -> Result<String, error::SystemError> {
        eprint!("{label}: ");
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(error::SystemError::bad_request(format!("No input for {label}"))),
        }
    }

    /// Like [`Prompt::ask`] but refuses an empty answer.
    pub async fn ask_required(&mut self, label: &str) -> Result<String, error::SystemError> {
        let answer = self.ask(label).await?;
        if answer.is_empty() {
            return Err(error::SystemError::bad_request(format!("{label} cannot be empty")));
        }
        Ok(answer)
    }
}
