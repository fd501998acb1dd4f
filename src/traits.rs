// Copyright (c) 2024 Mike Tsao

//! The traits that define the relationships among parts of the system.

use crate::prelude::*;

/// A convenience struct for the fields implied by [Configurable]. Note that
/// this struct is not serde-compliant, because these fields typically aren't
/// meant to be serialized.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Configurables {
    sample_rate: SampleRate,
}
impl Configurable for Configurables {
    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.sample_rate = sample_rate
    }
}

/// Something that is [Configurable] is interested in staying in sync with the
/// host's global audio configuration.
pub trait Configurable {
    /// Returns this item's sample rate.
    fn sample_rate(&self) -> SampleRate {
        // I was too lazy to add this everywhere when I added this to the trait,
        // but I didn't want unexpected usage to go undetected.
        unimplemented!("Someone asked for a SampleRate but we provided default");
    }

    /// The sample rate changed.
    #[allow(unused_variables)]
    fn update_sample_rate(&mut self, sample_rate: SampleRate) {}

    /// Sent to indicate that it's time to reset internal state to its
    /// defaults. Modules should return to their initialized on/off and
    /// routing state.
    fn reset(&mut self) {}
}

/// Something that is [Serializable] might need to do work right before
/// serialization, or right after deserialization. These are the hooks.
///
/// The host contract is that knob/parameter values are restored before
/// `after_deser()` runs, so the hook may resolve legacy records against the
/// already-restored knobs.
pub trait Serializable {
    /// Called just before saving to disk.
    fn before_ser(&mut self) {}
    /// Called just after loading from disk.
    fn after_deser(&mut self) {}
}

/// Each app should have a Settings struct that is composed of subsystems
/// having their own settings. Implementing [HasSettings] helps the composed
/// struct manage its parts.
pub trait HasSettings {
    /// Whether the current state of this struct has been saved to disk.
    fn has_been_saved(&self) -> bool;
    /// Call this whenever the struct changes.
    fn needs_save(&mut self);
    /// Call this after a load() or a save().
    fn mark_clean(&mut self);
}

/// A [BusModule] is one mixer module in a daisy chain. Each module reads the
/// upstream bus state from its bus input port, adds its own contribution, and
/// writes the combined result to its bus output port for the next module
/// downstream.
///
/// The `process()` call runs once per audio frame inside the host's real-time
/// callback: it must not allocate, block, or perform I/O, and it must complete
/// in bounded time.
#[typetag::serde(tag = "type")]
pub trait BusModule: Configurable + Serializable + core::fmt::Debug + Send {
    /// Runs one audio frame: snapshots parameters, advances trigger, fader,
    /// and smoother state, and writes all six bus output channels.
    fn process(&mut self);
}
