//! Audio system for game sounds
//!
//! Randomized sound-effect and music dispatch: every play picks a random
//! entry from the event's bank and may jitter its pitch. Music is
//! exclusive; starting a track stops whatever was playing.

use bevy::audio::Volume;
use bevy::prelude::*;
use rand::Rng;
use sim::Transition;

use crate::player::ControllerTransition;
use crate::settings::Settings;
use crate::states::GameState;

/// Which output channel a sound belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCategory {
    Sfx,
    Music,
}

/// One playable sound.
#[derive(Clone)]
pub struct SoundDef {
    pub handle: Handle<AudioSource>,
    pub volume: f32,
    pub base_pitch: f32,
    /// Maximum absolute pitch offset per play; zero plays at base pitch.
    pub pitch_jitter: f32,
    pub looped: bool,
    pub category: SoundCategory,
}

impl SoundDef {
    fn sfx(handle: Handle<AudioSource>, volume: f32, pitch_jitter: f32) -> Self {
        Self {
            handle,
            volume,
            base_pitch: 1.0,
            pitch_jitter,
            looped: false,
            category: SoundCategory::Sfx,
        }
    }

    fn music(handle: Handle<AudioSource>, volume: f32) -> Self {
        Self {
            handle,
            volume,
            base_pitch: 1.0,
            pitch_jitter: 0.0,
            looped: true,
            category: SoundCategory::Music,
        }
    }
}

/// Resource holding all loaded sound banks.
#[derive(Resource)]
pub struct SoundBank {
    pub jump: Vec<SoundDef>,
    pub crouch: Vec<SoundDef>,
    pub music: Vec<SoundDef>,
}

/// Per-channel volume scalars, the mixer-group analog.
#[derive(Resource)]
pub struct AudioChannels {
    pub master: f32,
    pub sfx: f32,
    pub music: f32,
}

/// Marker for the currently playing music entity.
#[derive(Component)]
pub struct MusicTrack;

/// Marker for one-shot effect entities; they despawn when playback ends.
#[derive(Component)]
pub struct OneShotSound;

/// Load all audio assets on startup.
pub fn setup_audio(mut commands: Commands, settings: Res<Settings>, asset_server: Res<AssetServer>) {
    info!("Audio system: loading sound banks...");

    let jump = vec![
        SoundDef::sfx(asset_server.load("audio/sfx/jump_01.ogg"), 0.9, 0.1),
        SoundDef::sfx(asset_server.load("audio/sfx/jump_02.ogg"), 0.9, 0.1),
    ];
    let crouch = vec![SoundDef::sfx(
        asset_server.load("audio/sfx/cloth_shuffle.ogg"),
        0.6,
        0.15,
    )];
    let music = vec![
        SoundDef::music(asset_server.load("audio/music/rooftop_run.ogg"), 1.0),
        SoundDef::music(asset_server.load("audio/music/night_circuit.ogg"), 1.0),
    ];

    commands.insert_resource(SoundBank {
        jump,
        crouch,
        music,
    });
    commands.insert_resource(AudioChannels {
        master: settings.audio.master_volume,
        sfx: settings.audio.sfx_volume,
        music: settings.audio.music_volume,
    });
}

/// Pick a random entry from `bank` and start it. Music replaces the
/// current track; effects spawn fire-and-forget entities.
fn play_random(
    commands: &mut Commands,
    bank: &[SoundDef],
    channels: &AudioChannels,
    current_music: &Query<Entity, With<MusicTrack>>,
) {
    if bank.is_empty() {
        return;
    }

    let mut rng = rand::thread_rng();
    let def = &bank[rng.gen_range(0..bank.len())];

    let pitch = if def.pitch_jitter > 0.0 {
        def.base_pitch + rng.gen_range(-def.pitch_jitter..def.pitch_jitter)
    } else {
        def.base_pitch
    };

    let channel = match def.category {
        SoundCategory::Sfx => channels.sfx,
        SoundCategory::Music => channels.music,
    };
    let volume = Volume::Linear(def.volume * channel * channels.master);

    match def.category {
        SoundCategory::Music => {
            for entity in current_music.iter() {
                commands.entity(entity).despawn();
            }
            commands.spawn((
                MusicTrack,
                AudioPlayer::new(def.handle.clone()),
                PlaybackSettings::LOOP.with_volume(volume).with_speed(pitch),
            ));
        }
        SoundCategory::Sfx => {
            let playback = if def.looped {
                PlaybackSettings::LOOP
            } else {
                PlaybackSettings::DESPAWN
            };
            commands.spawn((
                OneShotSound,
                AudioPlayer::new(def.handle.clone()),
                playback.with_volume(volume).with_speed(pitch),
            ));
        }
    }
}

/// Kick off a random background track.
pub fn start_music(
    mut commands: Commands,
    bank: Res<SoundBank>,
    channels: Res<AudioChannels>,
    current_music: Query<Entity, With<MusicTrack>>,
) {
    play_random(&mut commands, &bank.music, &channels, &current_music);
}

/// Play effects for controller transitions.
pub fn play_transition_sfx(
    mut commands: Commands,
    mut transitions: MessageReader<ControllerTransition>,
    bank: Res<SoundBank>,
    channels: Res<AudioChannels>,
    current_music: Query<Entity, With<MusicTrack>>,
) {
    for ControllerTransition(kind) in transitions.read() {
        match kind {
            Transition::Jump => play_random(&mut commands, &bank.jump, &channels, &current_music),
            Transition::Crouch => {
                play_random(&mut commands, &bank.crouch, &channels, &current_music)
            }
            _ => {}
        }
    }
}

/// Audio plugin for easy integration
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        // The banks are inserted through Commands, so the music kickoff
        // has to wait for the Startup flush.
        app.add_systems(Startup, setup_audio);
        app.add_systems(PostStartup, start_music);
        app.add_systems(
            Update,
            play_transition_sfx.run_if(in_state(GameState::Playing)),
        );
    }
}
