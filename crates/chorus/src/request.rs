//! Caller-facing request types and the per-request scoped resource guard.
//!
//! Requests are validated here, at the boundary, before a task ever exists:
//! a malformed request fails with [`Error::InvalidRequest`] and never enters
//! the scheduler.

use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// How the engine should condition the synthesized voice.
///
/// This is the tagged union replacing dispatch-by-model-shape: the variant is
/// decided at the boundary and the scheduler never inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisMode {
    /// Clone the voice in the reference clip. When `transcript` is `None`
    /// the engine applies its default prompt transcript.
    ZeroShot { transcript: Option<String> },

    /// Clone the reference voice while following a style instruction
    /// ("speak slowly", "sound excited", ...).
    Instruct { instruction: String },
}

/// Handle to the reference clip that conditions the voice.
///
/// The scheduler only ever reads the path; ownership of the underlying bytes
/// (and their eventual removal, for uploaded clips) stays with the caller via
/// [`ScopedResource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceReference {
    pub path: PathBuf,
}

impl VoiceReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// A per-request temporary resource with a release-once obligation.
///
/// Typically the uploaded reference clip written to a temp file: the release
/// closure unlinks it. Release happens exactly once, on every exit path —
/// explicit release, normal drop after relay, or drop on caller disconnect —
/// enforced by `Option::take`.
pub struct ScopedResource {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ScopedResource {
    /// Wraps a release action to run when the request reaches a terminal
    /// state.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard with nothing to release, for requests referencing persistent
    /// clips.
    pub fn noop() -> Self {
        Self { release: None }
    }

    /// Runs the release action now. Subsequent calls (and drop) are no-ops.
    pub fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for ScopedResource {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ScopedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedResource")
            .field("pending", &self.release.is_some())
            .finish()
    }
}

/// The immutable payload a task carries into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisInput {
    pub text: String,
    pub mode: SynthesisMode,
    pub reference: VoiceReference,
}

/// One caller's synthesis request.
///
/// Split at submission into the immutable [`SynthesisInput`] handed to the
/// scheduler and the [`ScopedResource`] retained by the caller-side stream
/// adapter.
#[derive(Debug)]
pub struct SynthesisRequest {
    pub text: String,
    pub mode: SynthesisMode,
    pub reference: VoiceReference,
    pub scope: Option<ScopedResource>,
}

impl SynthesisRequest {
    /// Pure voice-clone request.
    pub fn zero_shot(text: impl Into<String>, reference: VoiceReference) -> Self {
        Self {
            text: text.into(),
            mode: SynthesisMode::ZeroShot { transcript: None },
            reference,
            scope: None,
        }
    }

    /// Voice-clone request with a style instruction.
    pub fn instruct(
        text: impl Into<String>,
        instruction: impl Into<String>,
        reference: VoiceReference,
    ) -> Self {
        Self {
            text: text.into(),
            mode: SynthesisMode::Instruct {
                instruction: instruction.into(),
            },
            reference,
            scope: None,
        }
    }

    /// Supplies the transcript of the reference clip for zero-shot cloning.
    ///
    /// No effect on instruct requests.
    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        if let SynthesisMode::ZeroShot { transcript: slot } = &mut self.mode {
            *slot = Some(transcript.into());
        }
        self
    }

    /// Attaches the scoped resource owning the reference clip's lifetime.
    pub fn with_scope(mut self, scope: ScopedResource) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Boundary validation, run before any task is constructed.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::InvalidRequest("text must not be empty".into()));
        }
        if self.reference.path.as_os_str().is_empty() {
            return Err(Error::InvalidRequest(
                "voice reference path must not be empty".into(),
            ));
        }
        if let SynthesisMode::Instruct { instruction } = &self.mode {
            if instruction.trim().is_empty() {
                return Err(Error::InvalidRequest(
                    "instruction must not be empty".into(),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (SynthesisInput, Option<ScopedResource>) {
        (
            SynthesisInput {
                text: self.text,
                mode: self.mode,
                reference: self.reference,
            },
            self.scope,
        )
    }
}
