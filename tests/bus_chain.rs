// Copyright (c) 2024 Mike Tsao

//! Exercises a daisy chain of strips into the master module, patched together
//! the way a host connects bus cables.

use tribus::prelude::*;

const TEST_RATE: SampleRate = SampleRate::new(1000);

fn run_chain(
    mini: &mut MiniStripCore,
    strip: &mut StereoStripCore,
    master: &mut MasterCore,
    frames: usize,
) {
    for _ in 0..frames {
        mini.process();
        strip.inputs.bus.patch_from(&mini.outputs.bus);
        strip.process();
        master.inputs.bus.patch_from(&strip.outputs.bus);
        master.process();
    }
}

fn new_chain() -> (MiniStripCore, StereoStripCore, MasterCore) {
    let mut mini = MiniStripCore::default();
    let mut strip = StereoStripCoreBuilder::default().build().unwrap();
    let mut master = MasterCoreBuilder::default().build().unwrap();
    mini.update_sample_rate(TEST_RATE);
    strip.update_sample_rate(TEST_RATE);
    master.update_sample_rate(TEST_RATE);
    (mini, strip, master)
}

#[test]
fn chained_strips_sum_onto_the_red_bus() {
    let (mut mini, mut strip, mut master) = new_chain();
    mini.inputs.mix.set_voltage(1.0);
    strip.inputs.left.set_voltage(2.0);

    // long enough for every ramp and smoother in the chain to settle
    run_chain(&mut mini, &mut strip, &mut master, 60);

    assert_eq!(master.outputs.bus.channel_voltage(4), 3.0);
    assert_eq!(master.outputs.bus.channel_voltage(5), 3.0);
    assert_eq!(master.outputs.left.voltage(), 3.0);
    assert_eq!(master.outputs.right.voltage(), 3.0);
}

#[test]
fn blue_and_orange_buses_stay_isolated_until_the_final_sum() {
    let (mut mini, mut strip, mut master) = new_chain();
    mini.params.levels = [1.0, 0.0, 0.0]; // blue only
    strip.params.levels = [0.0, 1.0, 0.0]; // orange only
    mini.inputs.mix.set_voltage(1.0);
    strip.inputs.left.set_voltage(2.0);

    run_chain(&mut mini, &mut strip, &mut master, 60);

    assert_eq!(master.outputs.bus.channel_voltage(0), 1.0);
    assert_eq!(master.outputs.bus.channel_voltage(2), 2.0);
    assert_eq!(master.outputs.bus.channel_voltage(4), 0.0);
    // the stereo outputs are the only place the buses meet
    assert_eq!(master.outputs.left.voltage(), 3.0);
    assert_eq!(master.outputs.right.voltage(), 3.0);
}

#[test]
fn every_hop_declares_six_bus_channels() {
    let (mut mini, mut strip, mut master) = new_chain();
    run_chain(&mut mini, &mut strip, &mut master, 1);
    assert_eq!(mini.outputs.bus.channels(), BUS_CHANNELS);
    assert_eq!(strip.outputs.bus.channels(), BUS_CHANNELS);
    assert_eq!(master.outputs.bus.channels(), BUS_CHANNELS);
}

#[test]
fn mono_cable_into_a_bus_input_broadcasts_to_every_bus() {
    let mut master = MasterCoreBuilder::default().build().unwrap();
    master.update_sample_rate(TEST_RATE);
    master.inputs.bus.set_voltage(1.0);
    for _ in 0..60 {
        master.process();
    }
    for channel in 0..BUS_CHANNELS {
        assert_eq!(master.outputs.bus.channel_voltage(channel), 1.0);
    }
    assert_eq!(master.outputs.left.voltage(), 3.0);
    assert_eq!(master.outputs.right.voltage(), 3.0);
}

#[test]
fn master_fade_out_silences_the_chain_but_not_the_strips() {
    let (mut mini, mut strip, mut master) = new_chain();
    mini.inputs.mix.set_voltage(1.0);
    run_chain(&mut mini, &mut strip, &mut master, 60);
    assert_eq!(master.outputs.left.voltage(), 1.0);

    master.params.on_button = 1.0;
    run_chain(&mut mini, &mut strip, &mut master, 60);
    assert!(!master.is_on());
    assert_eq!(master.outputs.left.voltage(), 0.0);
    assert_eq!(master.outputs.bus.channel_voltage(4), 0.0);
    // upstream modules keep feeding the bus
    assert_eq!(strip.outputs.bus.channel_voltage(4), 1.0);
}
