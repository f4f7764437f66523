//! Audio cues
//!
//! The simulation only says *which* cue to play; sinks decide how. Playback
//! is fire-and-forget: a failing sink is logged by the session and never
//! affects game state.

use std::fmt;

/// Sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Gift collected
    Score,
    /// Ability box opened
    PowerUp,
    /// Shield soaked up a hit
    ShieldBreak,
    /// Run ended
    Crash,
    /// Run ended on a new best
    HighScore,
}

/// Playback failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No audio device/context
    Unavailable,
    /// Host refused playback (e.g. no user gesture yet)
    Rejected(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable => write!(f, "audio unavailable"),
            AudioError::Rejected(why) => write!(f, "playback rejected: {why}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Something that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError>;
}

/// Sink for headless runs: logs cues at debug level
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError> {
        log::debug!("cue {:?} @ {:.2}", cue, volume);
        Ok(())
    }
}

/// Procedural Web Audio cues - no sound files needed
#[cfg(target_arch = "wasm32")]
pub struct WebAudio {
    ctx: Option<web_sys::AudioContext>,
}

#[cfg(target_arch = "wasm32")]
impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl WebAudio {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = web_sys::AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx }
    }

    /// Create an oscillator routed through a gain envelope
    fn create_osc(
        ctx: &web_sys::AudioContext,
        freq: f32,
        osc_type: web_sys::OscillatorType,
    ) -> Option<(web_sys::OscillatorNode, web_sys::GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Play a run of notes, `spacing` seconds apart
    fn arpeggio(
        ctx: &web_sys::AudioContext,
        vol: f32,
        freqs: &[f32],
        spacing: f64,
        length: f64,
        osc_type: web_sys::OscillatorType,
    ) -> Result<(), AudioError> {
        for (i, freq) in freqs.iter().enumerate() {
            let (osc, gain) = Self::create_osc(ctx, *freq, osc_type).ok_or(AudioError::Unavailable)?;
            let t = ctx.current_time() + i as f64 * spacing;
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + length).ok();
            osc.start_with_when(t)
                .map_err(|e| AudioError::Rejected(format!("{:?}", e)))?;
            osc.stop_with_when(t + length + 0.05).ok();
        }
        Ok(())
    }

    /// Crash - low sweep down
    fn crash(ctx: &web_sys::AudioContext, vol: f32) -> Result<(), AudioError> {
        let (osc, gain) = Self::create_osc(ctx, 300.0, web_sys::OscillatorType::Sawtooth)
            .ok_or(AudioError::Unavailable)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.6).ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency().exponential_ramp_to_value_at_time(30.0, t + 0.6).ok();

        osc.start().map_err(|e| AudioError::Rejected(format!("{:?}", e)))?;
        osc.stop_with_when(t + 0.7).ok();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioSink for WebAudio {
    fn play(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError> {
        use web_sys::OscillatorType;

        if volume <= 0.0 {
            return Ok(());
        }
        let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

        // Browsers start contexts suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Score => Self::arpeggio(ctx, volume * 0.25, &[600.0, 900.0], 0.06, 0.12, OscillatorType::Sine),
            Cue::PowerUp => Self::arpeggio(ctx, volume * 0.25, &[500.0, 700.0, 1000.0], 0.08, 0.15, OscillatorType::Triangle),
            Cue::ShieldBreak => Self::arpeggio(ctx, volume * 0.3, &[800.0, 400.0], 0.05, 0.2, OscillatorType::Square),
            Cue::Crash => Self::crash(ctx, volume),
            Cue::HighScore => {
                Self::crash(ctx, volume)?;
                Self::arpeggio(ctx, volume * 0.25, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08, 0.25, OscillatorType::Triangle)
            }
        }
    }
}
