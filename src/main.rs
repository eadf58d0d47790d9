//! Flappy Dash entry point
//!
//! Native builds run a headless scripted demo of the simulation and log the
//! event stream; wasm32 builds expose a small driver the browser shell
//! calls into once per animation frame.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use flappy_dash::highscores::BestScore;
    use flappy_dash::settings::Settings;
    use flappy_dash::sim::{GameEvent, GameState, TickInput, tick};
    use flappy_dash::skins::SkinCollection;
    use flappy_dash::tuning::Tuning;

    /// Game instance holding the sim plus its persisted collaborators
    #[wasm_bindgen]
    pub struct Game {
        state: GameState,
        input: TickInput,
        skins: SkinCollection,
        best: BestScore,
        settings: Settings,
        last_events: Vec<GameEvent>,
    }

    #[wasm_bindgen]
    impl Game {
        #[wasm_bindgen(constructor)]
        pub fn new(seed: u64) -> Result<Game, JsError> {
            let state = GameState::new(Tuning::default(), seed)
                .map_err(|e| JsError::new(&e.to_string()))?;
            Ok(Game {
                state,
                input: TickInput::default(),
                skins: SkinCollection::load(),
                best: BestScore::load(),
                settings: Settings::load(),
                last_events: Vec::new(),
            })
        }

        /// Queue a start/restart for the next tick, reading the selected
        /// skin's radius at that moment
        pub fn start(&mut self) {
            self.input.start = Some(self.skins.bird_radius());
        }

        pub fn flap(&mut self) {
            self.input.flap = true;
        }

        /// Advance one frame; `now` is the rAF timestamp in ms
        pub fn tick(&mut self, now: f64) {
            tick(&mut self.state, &self.input, now);
            // One-shot inputs are consumed by the tick
            self.input = TickInput::default();

            let events = self.state.take_events();
            for event in &events {
                match event {
                    GameEvent::UnlockCheckRequested(score) => {
                        if !self.skins.check_unlocks(*score).is_empty() {
                            self.skins.save();
                        }
                    }
                    GameEvent::GameOver(final_score) => {
                        if self.best.maybe_update(*final_score) {
                            self.best.save();
                        }
                    }
                    _ => {}
                }
            }
            self.last_events = events;
        }

        pub fn score(&self) -> u64 {
            self.state.score
        }

        pub fn best_score(&self) -> u64 {
            self.best.score
        }

        pub fn select_skin(&mut self, id: &str) -> bool {
            let ok = self.skins.select(id);
            if ok {
                self.skins.save();
            }
            ok
        }

        pub fn reset_best(&mut self) {
            self.best.reset();
            self.best.save();
        }

        pub fn toggle_mute(&mut self) -> bool {
            let muted = self.settings.toggle_mute();
            self.settings.save();
            muted
        }

        /// Draw-ready state snapshot for the canvas renderer
        pub fn state_json(&self) -> String {
            serde_json::to_string(&self.state).unwrap_or_default()
        }

        /// Events from the last tick (sounds, popups, screen flips)
        pub fn events_json(&self) -> String {
            serde_json::to_string(&self.last_events).unwrap_or_default()
        }
    }

    #[wasm_bindgen(start)]
    pub fn init() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Real entry is #[wasm_bindgen(start)]; the bin target still wants a main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_dash::consts::NOMINAL_TICK_MS;
    use flappy_dash::highscores::BestScore;
    use flappy_dash::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use flappy_dash::skins::SkinCollection;
    use flappy_dash::tuning::Tuning;

    env_logger::init();

    let mut skins = SkinCollection::load();
    let mut best = BestScore::load();
    let mut state =
        GameState::new(Tuning::default(), 42).expect("default tuning is valid");

    let start = TickInput {
        start: Some(skins.bird_radius()),
        flap: false,
    };
    tick(&mut state, &start, 0.0);

    let mut now = 0.0;
    for frame in 0..36_000u32 {
        now += NOMINAL_TICK_MS;
        // Lazy flap cadence; the demo ends when it inevitably crashes
        let input = TickInput {
            start: None,
            flap: frame % 9 == 0,
        };
        tick(&mut state, &input, now);

        for event in state.take_events() {
            match event {
                GameEvent::ScoreChanged(score) => log::info!("score: {score}"),
                GameEvent::PickupCollected(kind) => log::info!("picked up {kind:?}"),
                GameEvent::PipesCleared => log::info!("boom, pipes cleared"),
                GameEvent::EffectStarted(kind, until) => {
                    log::debug!("effect {kind:?} active until {until:.0}")
                }
                GameEvent::UnlockCheckRequested(score) => {
                    for name in skins.check_unlocks(score) {
                        log::info!("unlocked skin: {name}");
                    }
                }
                GameEvent::GameOver(final_score) => {
                    if best.maybe_update(final_score) {
                        best.save();
                        log::info!("new best: {final_score}");
                    }
                }
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "demo over: score {}, best {}, {:.1}s survived",
        state.score,
        best.score,
        now / 1000.0
    );
}
