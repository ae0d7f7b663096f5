use crate::config::settings::{LocationSettings, PermissionMode};
use crate::core::{Coordinate, LocationGate, PermissionStatus};
use async_trait::async_trait;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Reports a configured position with a fixed permission answer.
#[derive(Debug, Clone)]
pub struct FixedLocationGate {
    position: Option<Coordinate>,
    granted: bool,
}

impl FixedLocationGate {
    pub fn new(position: Option<Coordinate>, granted: bool) -> Self {
        Self { position, granted }
    }
}

#[async_trait]
impl LocationGate for FixedLocationGate {
    fn has_location_permission(&self) -> bool {
        self.granted
    }

    async fn request_location_permission(&self) -> PermissionStatus {
        if self.granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    async fn last_known_position(&self) -> Option<Coordinate> {
        self.position
    }
}

type AnswerSource = Box<dyn BufRead + Send>;

/// Asks the user for location access on the terminal.
///
/// The question is asked at most once; the answer is delivered through a
/// oneshot channel from a blocking reader task. EOF, a read error or a
/// dropped sender count as a dismissed prompt.
pub struct PromptLocationGate {
    position: Option<Coordinate>,
    granted: AtomicBool,
    answers: Mutex<Option<AnswerSource>>,
    prompt: String,
}

impl PromptLocationGate {
    pub fn new(position: Option<Coordinate>, answers: AnswerSource) -> Self {
        Self {
            position,
            granted: AtomicBool::new(false),
            answers: Mutex::new(Some(answers)),
            prompt: "Allow access to your location? [y/N] ".to_string(),
        }
    }

    pub fn stdin(position: Option<Coordinate>) -> Self {
        Self::new(position, Box::new(std::io::BufReader::new(std::io::stdin())))
    }

    fn take_answers(&self) -> Option<AnswerSource> {
        self.answers.lock().ok().and_then(|mut guard| guard.take())
    }
}

pub fn parse_answer(line: &str) -> PermissionStatus {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => PermissionStatus::Granted,
        _ => PermissionStatus::Denied,
    }
}

#[async_trait]
impl LocationGate for PromptLocationGate {
    fn has_location_permission(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request_location_permission(&self) -> PermissionStatus {
        let Some(mut answers) = self.take_answers() else {
            tracing::debug!("Permission prompt already used");
            return PermissionStatus::Denied;
        };

        let (tx, rx) = oneshot::channel();
        let prompt = self.prompt.clone();
        tokio::task::spawn_blocking(move || {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "{}", prompt);
            let _ = stderr.flush();

            let mut line = String::new();
            match answers.read_line(&mut line) {
                Ok(0) | Err(_) => {}
                Ok(_) => {
                    let _ = tx.send(parse_answer(&line));
                }
            }
        });

        let status = rx.await.unwrap_or(PermissionStatus::Denied);
        self.granted.store(status.is_granted(), Ordering::SeqCst);
        status
    }

    async fn last_known_position(&self) -> Option<Coordinate> {
        self.position
    }
}

/// 依設定建立對應的 location gate
pub fn gate_from_settings(settings: &LocationSettings) -> Box<dyn LocationGate> {
    match settings.permission {
        PermissionMode::Granted => Box::new(FixedLocationGate::new(settings.position, true)),
        PermissionMode::Denied => Box::new(FixedLocationGate::new(settings.position, false)),
        PermissionMode::Prompt => Box::new(PromptLocationGate::stdin(settings.position)),
    }
}

#[async_trait]
impl LocationGate for Box<dyn LocationGate> {
    fn has_location_permission(&self) -> bool {
        (**self).has_location_permission()
    }

    async fn request_location_permission(&self) -> PermissionStatus {
        (**self).request_location_permission().await
    }

    async fn last_known_position(&self) -> Option<Coordinate> {
        (**self).last_known_position().await
    }
}
