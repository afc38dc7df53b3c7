//! Instrument tracks
//!
//! A track is one instrument's note list, already extracted from a music file
//! into JSON. Each track drives its own ball: note times become that ball's
//! impact schedule. Tracks never interact, so they are simulated in parallel.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::settings::SimSettings;
use crate::sim::{Ball, Planner, Trajectory};

/// General MIDI program names, indexed by program number
#[rustfmt::skip]
pub const GM_INSTRUMENTS: [&str; 128] = [
    "Acoustic Grand Piano", "Bright Acoustic Piano", "Electric Grand Piano", "Honky-tonk Piano",
    "Electric Piano 1", "Electric Piano 2", "Harpsichord", "Clavinet",
    "Celesta", "Glockenspiel", "Music Box", "Vibraphone",
    "Marimba", "Xylophone", "Tubular Bells", "Dulcimer",
    "Drawbar Organ", "Percussive Organ", "Rock Organ", "Church Organ",
    "Reed Organ", "Accordion", "Harmonica", "Tango Accordion",
    "Acoustic Guitar (nylon)", "Acoustic Guitar (steel)", "Electric Guitar (jazz)", "Electric Guitar (clean)",
    "Electric Guitar (muted)", "Overdriven Guitar", "Distortion Guitar", "Guitar Harmonics",
    "Acoustic Bass", "Electric Bass (finger)", "Electric Bass (pick)", "Fretless Bass",
    "Slap Bass 1", "Slap Bass 2", "Synth Bass 1", "Synth Bass 2",
    "Violin", "Viola", "Cello", "Contrabass",
    "Tremolo Strings", "Pizzicato Strings", "Orchestral Harp", "Timpani",
    "String Ensemble 1", "String Ensemble 2", "Synth Strings 1", "Synth Strings 2",
    "Choir Aahs", "Voice Oohs", "Synth Choir", "Orchestra Hit",
    "Trumpet", "Trombone", "Tuba", "Muted Trumpet",
    "French Horn", "Brass Section", "Synth Brass 1", "Synth Brass 2",
    "Soprano Sax", "Alto Sax", "Tenor Sax", "Baritone Sax",
    "Oboe", "English Horn", "Bassoon", "Clarinet",
    "Piccolo", "Flute", "Recorder", "Pan Flute",
    "Blown Bottle", "Shakuhachi", "Whistle", "Ocarina",
    "Lead 1 (square)", "Lead 2 (sawtooth)", "Lead 3 (calliope)", "Lead 4 (chiff)",
    "Lead 5 (charang)", "Lead 6 (voice)", "Lead 7 (fifths)", "Lead 8 (bass + lead)",
    "Pad 1 (new age)", "Pad 2 (warm)", "Pad 3 (polysynth)", "Pad 4 (choir)",
    "Pad 5 (bowed)", "Pad 6 (metallic)", "Pad 7 (halo)", "Pad 8 (sweep)",
    "FX 1 (rain)", "FX 2 (soundtrack)", "FX 3 (crystal)", "FX 4 (atmosphere)",
    "FX 5 (brightness)", "FX 6 (goblins)", "FX 7 (echoes)", "FX 8 (sci-fi)",
    "Sitar", "Banjo", "Shamisen", "Koto",
    "Kalimba", "Bagpipe", "Fiddle", "Shanai",
    "Tinkle Bell", "Agogo", "Steel Drums", "Woodblock",
    "Taiko Drum", "Melodic Tom", "Synth Drum", "Reverse Cymbal",
    "Guitar Fret Noise", "Breath Noise", "Seashore", "Bird Tweet",
    "Telephone Ring", "Helicopter", "Applause", "Gunshot",
];

/// Name for a GM program number
pub fn gm_instrument_name(number: i64) -> &'static str {
    usize::try_from(number)
        .ok()
        .and_then(|n| GM_INSTRUMENTS.get(n))
        .copied()
        .unwrap_or("Invalid instrument number")
}

/// A single note event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Start time in seconds from the beginning of the piece
    pub time: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midi: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
}

/// Instrument assignment of a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One instrument track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<Instrument>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Track {
    /// Track name, else instrument name, else the GM name for its program
    pub fn display_name(&self) -> String {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        if let Some(name) = non_empty(&self.name) {
            return name;
        }
        match &self.instrument {
            Some(instrument) => non_empty(&instrument.name)
                .unwrap_or_else(|| gm_instrument_name(instrument.number).to_string()),
            None => "Untitled".to_string(),
        }
    }

    /// Note start times, ascending
    pub fn impact_times(&self) -> Vec<f64> {
        let mut times: Vec<f64> = self.notes.iter().map(|n| n.time).collect();
        times.sort_by(f64::total_cmp);
        times
    }
}

/// Per-track simulation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSim {
    /// Initial ball the trajectory started from
    pub ball: Ball,
    #[serde(flatten)]
    pub trajectory: Trajectory,
}

/// Simulations keyed by unique track name
pub type TrackSims = BTreeMap<String, TrackSim>;

/// Read tracks from a JSON array, dropping tracks without notes
pub fn load_tracks(path: &Path) -> Result<Vec<Track>> {
    let json = fs::read_to_string(path)?;
    let tracks = parse_tracks(&json)?;
    log::info!("Loaded {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// Parse tracks from JSON text, dropping tracks without notes
pub fn parse_tracks(json: &str) -> Result<Vec<Track>> {
    let tracks: Vec<Track> = serde_json::from_str(json)?;
    let total = tracks.len();
    let tracks: Vec<Track> = tracks.into_iter().filter(|t| !t.notes.is_empty()).collect();
    if tracks.len() < total {
        log::warn!("Skipped {} tracks with no notes", total - tracks.len());
    }
    Ok(tracks)
}

/// Give every track a distinct name, suffixing repeats with `#n`
fn unique_names(tracks: &[Track]) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    tracks
        .iter()
        .map(|track| {
            let base = track.display_name();
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                let renamed = format!("{} #{}", base, count);
                log::warn!("Duplicate track name {:?}, using {:?}", base, renamed);
                renamed
            }
        })
        .collect()
}

/// Simulate one ball per track, all starting from the settings' ball
///
/// Fails if any track fails; the error is logged with the track's name.
pub fn simulate_tracks(tracks: &[Track], settings: &SimSettings) -> Result<TrackSims> {
    let planner = Planner::with_settings(settings);
    planner.validate()?;
    let ball = settings.ball;

    let names = unique_names(tracks);
    tracks
        .par_iter()
        .zip(names.into_par_iter())
        .map(|(track, name)| -> Result<(String, TrackSim)> {
            let times = track.impact_times();
            let trajectory = planner
                .simulate(&ball, &times)
                .inspect_err(|e| log::error!("Track {:?} failed: {}", name, e))?;
            log::info!(
                "Track {:?}: {} impacts, {} frames",
                name,
                trajectory.lines.len(),
                trajectory.frame_count()
            );
            Ok((name, TrackSim { ball, trajectory }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn note(time: f64) -> Note {
        Note {
            time,
            duration: 0.25,
            midi: Some(60),
            velocity: None,
        }
    }

    #[test]
    fn test_gm_instrument_name() {
        assert_eq!(gm_instrument_name(0), "Acoustic Grand Piano");
        assert_eq!(gm_instrument_name(40), "Violin");
        assert_eq!(gm_instrument_name(127), "Gunshot");
        assert_eq!(gm_instrument_name(128), "Invalid instrument number");
        assert_eq!(gm_instrument_name(-1), "Invalid instrument number");
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut track = Track::default();
        assert_eq!(track.display_name(), "Untitled");

        track.instrument = Some(Instrument {
            number: 33,
            name: None,
        });
        assert_eq!(track.display_name(), "Electric Bass (finger)");

        track.instrument = Some(Instrument {
            number: 33,
            name: Some("bass".into()),
        });
        assert_eq!(track.display_name(), "bass");

        track.name = Some("  ".into());
        assert_eq!(track.display_name(), "bass");

        track.name = Some("Lead".into());
        assert_eq!(track.display_name(), "Lead");
    }

    #[test]
    fn test_impact_times_sorted() {
        let track = Track {
            notes: vec![note(2.0), note(0.5), note(1.0), note(0.5)],
            ..Default::default()
        };
        assert_eq!(track.impact_times(), vec![0.5, 0.5, 1.0, 2.0]);
    }

    #[test]
    fn test_parse_tracks_skips_empty() {
        let json = r#"[
            {"name": "Piano", "notes": [{"time": 0.5}, {"time": 1.0, "duration": 0.5, "midi": 64}]},
            {"name": "Silent", "notes": []},
            {"instrument": {"number": 0}, "notes": [{"time": 0.25}]}
        ]"#;
        let tracks = parse_tracks(json).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].notes[1].midi, Some(64));
        assert_eq!(tracks[1].display_name(), "Acoustic Grand Piano");
    }

    #[test]
    fn test_unique_names() {
        let piano = Track {
            name: Some("Piano".into()),
            ..Default::default()
        };
        let names = unique_names(&[piano.clone(), piano.clone(), piano]);
        assert_eq!(names, vec!["Piano", "Piano #2", "Piano #3"]);
    }

    #[test]
    fn test_simulate_tracks_independent() {
        let settings = SimSettings {
            frame_rate: 20.0,
            ..Default::default()
        };
        let short = Track {
            name: Some("Short".into()),
            notes: vec![note(0.5)],
            ..Default::default()
        };
        let long = Track {
            name: Some("Long".into()),
            notes: vec![note(0.5), note(1.0), note(3.0)],
            ..Default::default()
        };

        let sims = simulate_tracks(&[short.clone(), long], &settings).unwrap();
        assert_eq!(sims.len(), 2);
        assert_eq!(sims["Short"].trajectory.lines.len(), 1);
        assert_eq!(sims["Long"].trajectory.lines.len(), 3);
        assert_eq!(sims["Short"].ball, settings.ball);

        // Same track alone gives the same result
        let alone = simulate_tracks(&[short], &settings).unwrap();
        assert_eq!(alone["Short"], sims["Short"]);
    }

    #[test]
    fn test_simulate_tracks_reports_bad_schedule() {
        let bad = Track {
            name: Some("Bad".into()),
            notes: vec![note(-1.0)],
            ..Default::default()
        };
        let err = simulate_tracks(&[bad], &SimSettings::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidSchedule { .. }));
    }

    #[test]
    fn test_track_sim_json_shape() {
        let settings = SimSettings::default();
        let track = Track {
            name: Some("Drums".into()),
            notes: vec![note(0.1)],
            ..Default::default()
        };
        let sims = simulate_tracks(&[track], &settings).unwrap();
        let value = serde_json::to_value(&sims).unwrap();
        let drums = &value["Drums"];
        assert!(drums["ball"].is_object());
        assert!(drums["points"].is_array());
        assert!(drums["impactPoints"].is_array());
        assert!(drums["lines"].is_array());
    }
}
