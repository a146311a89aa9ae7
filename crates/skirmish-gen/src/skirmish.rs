//! Two-team skirmish simulation that emits an event log
//!
//! Units of teams `A` and `B` spawn on opposite sides of a square arena,
//! walk toward the nearest enemy and trade blows once per simulated second.
//! Every state change is written as one NDJSON record.

use crate::error::{Error, Result};
use crate::rng::SkirmishRng;
use skirmish_log::{EventData, EventKind, RawEventRecord};
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Maximum distance at which a unit can attack
pub const ATTACK_RANGE: f64 = 5.0;
/// Movement speed in arena units per second
pub const MOVE_SPEED: f64 = 2.0;
/// Distances below this count as "arrived"
pub const MIN_MOVE_DISTANCE: f64 = 0.2;

const TEAMS: [&str; 2] = ["A", "B"];
const SPAWN_MARGIN: f64 = 2.0;
const WAYPOINT_MARGIN: f64 = 1.0;
const WALL_MARGIN: f64 = 0.5;
const MAX_HP: i32 = 100;
const COMBAT_INTERVAL_MS: u64 = 1000;

/// Generator settings
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// RNG seed; the same seed always produces the same log
    pub seed: u64,
    /// Units per team
    pub per_team: usize,
    /// Side length of the square arena
    pub arena_size: f64,
    /// Simulated duration in seconds
    pub duration_s: u64,
    /// Simulated milliseconds between movement steps
    pub tick_ms: u64,
    /// Pace output to wall-clock time and flush every step
    pub realtime: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            per_team: 3,
            arena_size: 20.0,
            duration_s: 25,
            tick_ms: 200,
            realtime: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Unit {
    id: String,
    team: &'static str,
    x: f64,
    y: f64,
    hp: i32,
    alive: bool,
    waypoint: (f64, f64),
}

impl Unit {
    fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }
}

/// The skirmish simulation
#[derive(Debug)]
pub struct Skirmish {
    config: GeneratorConfig,
    rng: SkirmishRng,
    /// Units in spawn order
    units: Vec<Unit>,
    time_ms: u64,
    steps_left: u64,
    last_combat_s: Option<u64>,
    pending: Vec<RawEventRecord>,
}

impl Skirmish {
    /// Create a simulation; nothing is emitted until `run` or `generate`
    ///
    /// The simulation takes `duration_s * 1000 / tick_ms` whole steps, so no
    /// record is stamped past the duration. A zero `tick_ms` is rejected.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        if config.tick_ms == 0 {
            return Err(Error::InvalidConfig("tick_ms must be at least 1".into()));
        }
        Ok(Self {
            rng: SkirmishRng::new(config.seed),
            steps_left: config.duration_s * 1000 / config.tick_ms,
            config,
            units: Vec::new(),
            time_ms: 0,
            last_combat_s: None,
            pending: Vec::new(),
        })
    }

    /// Simulate the whole skirmish and collect every record
    pub fn generate(mut self) -> Vec<RawEventRecord> {
        let mut records = Vec::new();
        self.seed_units();
        records.append(&mut self.pending);
        while self.step() {
            records.append(&mut self.pending);
        }
        records
    }

    /// Simulate the whole skirmish, writing NDJSON lines to `out`
    ///
    /// Returns the number of records written.
    pub fn run<W: Write>(mut self, out: &mut W) -> Result<usize> {
        let started = Instant::now();
        let mut written = 0;

        self.seed_units();
        written += self.flush_pending(out)?;

        while self.step() {
            written += self.flush_pending(out)?;
            if self.config.realtime {
                let ahead = Duration::from_millis(self.time_ms).saturating_sub(started.elapsed());
                if !ahead.is_zero() {
                    thread::sleep(ahead);
                }
            }
        }

        out.flush()?;
        info!(records = written, duration_ms = self.time_ms, "skirmish log generated");
        Ok(written)
    }

    fn flush_pending<W: Write>(&mut self, out: &mut W) -> Result<usize> {
        let count = self.pending.len();
        for record in self.pending.drain(..) {
            serde_json::to_writer(&mut *out, &record)?;
            out.write_all(b"\n")?;
        }
        if self.config.realtime {
            out.flush()?;
        }
        Ok(count)
    }

    /// Advance one movement step. Returns false once the duration is reached.
    fn step(&mut self) -> bool {
        if self.steps_left == 0 {
            return false;
        }
        self.steps_left -= 1;
        self.time_ms += self.config.tick_ms;

        self.step_moves();
        let second = self.time_ms / COMBAT_INTERVAL_MS;
        if self.last_combat_s != Some(second) {
            self.last_combat_s = Some(second);
            self.step_combat();
        }
        true
    }

    fn emit(&mut self, kind: EventKind, id: &str, data: EventData) {
        self.pending
            .push(RawEventRecord::new(self.time_ms as f64, kind, id, data));
    }

    fn seed_units(&mut self) {
        let arena = self.config.arena_size;
        for team in TEAMS {
            for i in 0..self.config.per_team {
                let id = format!("{}{}", team, i + 1);
                let x = if team == "A" {
                    self.rng.range_f64(SPAWN_MARGIN, arena * 0.35)
                } else {
                    self.rng.range_f64(arena * 0.65, arena - SPAWN_MARGIN)
                };
                let y = self.rng.range_f64(SPAWN_MARGIN, arena - SPAWN_MARGIN);
                let waypoint = self.random_waypoint();

                self.emit(
                    EventKind::Spawned,
                    &id,
                    EventData {
                        name: format!("Unit {}", id),
                        team: team.to_string(),
                        x: round2(x),
                        y: round2(y),
                        hp: MAX_HP,
                        max_hp: MAX_HP,
                        ..EventData::default()
                    },
                );
                self.units.push(Unit {
                    id,
                    team,
                    x,
                    y,
                    hp: MAX_HP,
                    alive: true,
                    waypoint,
                });
            }
        }
        debug!(units = self.units.len(), "units spawned");
    }

    fn random_waypoint(&mut self) -> (f64, f64) {
        let max = self.config.arena_size - WAYPOINT_MARGIN;
        (
            self.rng.range_f64(WAYPOINT_MARGIN, max),
            self.rng.range_f64(WAYPOINT_MARGIN, max),
        )
    }

    /// Closest living enemy of `index` within attack range
    fn target_in_range(&self, index: usize) -> Option<usize> {
        let attacker = &self.units[index];
        let mut closest = None;
        let mut best = ATTACK_RANGE;
        for (i, unit) in self.units.iter().enumerate() {
            if !unit.alive || unit.team == attacker.team {
                continue;
            }
            let dist = attacker.distance_to(unit.x, unit.y);
            if dist <= best {
                best = dist;
                closest = Some(i);
            }
        }
        closest
    }

    /// Closest living enemy of `index` at any distance
    fn nearest_enemy(&self, index: usize) -> Option<usize> {
        let me = &self.units[index];
        self.units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.alive && u.team != me.team)
            .map(|(i, u)| (i, me.distance_to(u.x, u.y)))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }

    fn step_moves(&mut self) {
        let dt = self.config.tick_ms as f64 / 1000.0;
        let arena = self.config.arena_size;

        for index in 0..self.units.len() {
            if !self.units[index].alive || self.target_in_range(index).is_some() {
                continue;
            }

            if let Some(enemy) = self.nearest_enemy(index) {
                let (ex, ey) = (self.units[enemy].x, self.units[enemy].y);
                self.units[index].waypoint = (ex, ey);
            } else {
                let unit = &self.units[index];
                if unit.distance_to(unit.waypoint.0, unit.waypoint.1) < MIN_MOVE_DISTANCE {
                    let waypoint = self.random_waypoint();
                    self.units[index].waypoint = waypoint;
                }
            }

            let unit = &mut self.units[index];
            let (dx, dy) = (unit.waypoint.0 - unit.x, unit.waypoint.1 - unit.y);
            let dist = dx.hypot(dy);
            if dist <= MIN_MOVE_DISTANCE {
                continue;
            }

            let step = MOVE_SPEED * dt;
            unit.x = (unit.x + dx / dist * step).clamp(WALL_MARGIN, arena - WALL_MARGIN);
            unit.y = (unit.y + dy / dist * step).clamp(WALL_MARGIN, arena - WALL_MARGIN);
            let (id, x, y) = (unit.id.clone(), unit.x, unit.y);

            self.emit(
                EventKind::Moved,
                &id,
                EventData {
                    x: round2(x),
                    y: round2(y),
                    ..EventData::default()
                },
            );
        }
    }

    fn step_combat(&mut self) {
        let mut deaths = Vec::new();
        let attackers: Vec<usize> = (0..self.units.len())
            .filter(|&i| self.units[i].alive)
            .collect();

        for attacker in attackers {
            // May have died earlier in this phase
            if !self.units[attacker].alive {
                continue;
            }
            let Some(target) = self.target_in_range(attacker) else {
                continue;
            };

            let attacker_id = self.units[attacker].id.clone();
            let target_id = self.units[target].id.clone();
            self.emit(
                EventKind::Attacked,
                &attacker_id,
                EventData {
                    target_id: target_id.clone(),
                    ..EventData::default()
                },
            );

            let damage = self.rng.range_i64(8, 16) as i32;
            let victim = &mut self.units[target];
            victim.hp = (victim.hp - damage).max(0);
            let hp = victim.hp;
            if hp == 0 && victim.alive {
                victim.alive = false;
                deaths.push((target_id.clone(), attacker_id));
            }

            self.emit(
                EventKind::Damaged,
                &target_id,
                EventData {
                    amount: damage,
                    hp,
                    ..EventData::default()
                },
            );
        }

        for (victim, killer) in deaths {
            self.emit(
                EventKind::Died,
                &victim,
                EventData {
                    killer_id: killer,
                    ..EventData::default()
                },
            );
        }
    }
}

fn round2(value: f64) -> f32 {
    ((value * 100.0).round() / 100.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::Scheduler;
    use skirmish_log::LogLoader;
    use std::collections::{HashMap, HashSet};

    fn short_config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed,
            duration_s: 20,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_same_seed_same_log() {
        let a = Skirmish::new(short_config(7)).unwrap().generate();
        let b = Skirmish::new(short_config(7)).unwrap().generate();
        assert_eq!(a, b);

        let c = Skirmish::new(short_config(8)).unwrap().generate();
        assert_ne!(a, c);
    }

    #[test]
    fn test_spawns_first() {
        let records = Skirmish::new(GeneratorConfig::default()).unwrap().generate();
        let spawns: Vec<_> = records.iter().take(6).collect();

        for record in &spawns {
            assert_eq!(record.kind, EventKind::Spawned);
            assert_eq!(record.ts, 0.0);
            assert_eq!(record.data.max_hp, MAX_HP);
            assert_eq!(record.data.name, format!("Unit {}", record.id));
        }
        assert_eq!(spawns[0].id.as_str(), "A1");
        assert_eq!(spawns[3].id.as_str(), "B1");
        assert!(spawns[0].data.x <= 7.0);
        assert!(spawns[3].data.x >= 13.0);
    }

    #[test]
    fn test_log_is_time_ordered() {
        let records = Skirmish::new(GeneratorConfig::default()).unwrap().generate();
        assert!(records.windows(2).all(|w| w[0].ts <= w[1].ts));
        assert!(records.last().unwrap().ts <= 25_000.0);
    }

    #[test]
    fn test_uneven_tick_stays_within_duration() {
        let config = GeneratorConfig {
            tick_ms: 300,
            duration_s: 1,
            ..GeneratorConfig::default()
        };
        let records = Skirmish::new(config).unwrap().generate();
        let stamps: HashSet<u64> = records.iter().map(|r| r.ts as u64).collect();

        // 1000 / 300 = 3 whole steps
        assert!(stamps.iter().all(|ts| *ts <= 900));
        assert!(stamps.iter().all(|ts| ts % 300 == 0));
        assert!(stamps.contains(&0));
    }

    #[test]
    fn test_zero_tick_is_rejected() {
        let config = GeneratorConfig {
            tick_ms: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(Skirmish::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_combat_invariants() {
        let records = Skirmish::new(GeneratorConfig::default()).unwrap().generate();
        let mut last_hp: HashMap<String, i32> = HashMap::new();
        let mut dead: HashSet<String> = HashSet::new();

        for record in &records {
            let id = record.id.to_string();
            assert!(!dead.contains(&id), "record for dead unit {}", id);
            match record.kind {
                EventKind::Damaged => {
                    assert!((8..=16).contains(&record.data.amount));
                    assert!(record.data.hp >= 0);
                    last_hp.insert(id, record.data.hp);
                }
                EventKind::Died => {
                    assert_eq!(last_hp.get(&id), Some(&0));
                    assert!(!record.data.killer_id.is_empty());
                    dead.insert(id);
                }
                EventKind::Moved => {
                    assert!(record.data.x >= 0.5 && record.data.x <= 19.5);
                    assert!(record.data.y >= 0.5 && record.data.y <= 19.5);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_run_writes_ndjson() {
        let mut out = Vec::new();
        let written = Skirmish::new(short_config(3)).unwrap().run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), written);
        let expected = Skirmish::new(short_config(3)).unwrap().generate();
        assert_eq!(written, expected.len());
    }

    #[test]
    fn test_generated_log_replays() {
        let records = Skirmish::new(GeneratorConfig::default()).unwrap().generate();
        let died: HashSet<String> = records
            .iter()
            .filter(|r| r.kind == EventKind::Died)
            .map(|r| r.id.to_string())
            .collect();

        let mut text = String::new();
        for record in &records {
            text.push_str(&record.to_json_line().unwrap());
            text.push('\n');
        }

        let mut scheduler = Scheduler::new();
        let report = LogLoader::default().load_into(&text, &mut scheduler).unwrap();
        assert_eq!(report.queued, records.len());

        scheduler.start().unwrap();
        while !scheduler.is_drained() {
            scheduler.tick(0.1);
        }
        scheduler.tick(0.1);

        assert_eq!(scheduler.registry().len(), 6 - died.len());
        for entity in scheduler.registry().iter() {
            assert!(entity.alive());
            assert!(!died.contains(entity.id.as_str()));
        }
    }
}
