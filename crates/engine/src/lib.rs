//! Corpus-driven pseudo-classification engine. No real model is
//! trained: the engine accumulates reference images per crop, simulates
//! a training progression, and biases a weighted random draw by corpus
//! size. The random source is injectable so tests can seed it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use agro_core::locale;
use agro_core::models::{ClassificationResult, HealthStatus, Language, PlantType};

pub const MIN_TRAINING_IMAGES: usize = 5;
const PROGRESS_STEP: u8 = 10;
const DEFAULT_TRAINING_TICK: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Serialize)]
pub struct TrainingSnapshot {
    pub progress: u8,
    pub trained: bool,
    pub in_progress: bool,
    pub images_per_plant: HashMap<String, usize>,
}

#[derive(Debug)]
struct EngineState {
    corpus: HashMap<PlantType, Vec<String>>,
    plants: Vec<PlantType>,
    trained: bool,
    progress: u8,
    training_in_progress: bool,
}

/// One engine instance per process or per user context; never a
/// module-level singleton. Cheap to clone, shares state.
#[derive(Clone)]
pub struct RecognitionEngine {
    state: Arc<RwLock<EngineState>>,
    rng: Arc<Mutex<StdRng>>,
    training_tick: Duration,
}

impl Default for RecognitionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecognitionEngine {
    pub fn new() -> Self {
        Self::with_plants(&PlantType::ALL)
    }

    /// Restrict the supported-plant set. Mostly useful for tests that
    /// need exact selection probabilities.
    pub fn with_plants(plants: &[PlantType]) -> Self {
        let corpus = plants.iter().map(|plant| (*plant, Vec::new())).collect();
        Self {
            state: Arc::new(RwLock::new(EngineState {
                corpus,
                plants: plants.to_vec(),
                trained: false,
                progress: 0,
                training_in_progress: false,
            })),
            rng: Arc::new(Mutex::new(StdRng::from_os_rng())),
            training_tick: DEFAULT_TRAINING_TICK,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    pub fn with_training_tick(mut self, tick: Duration) -> Self {
        self.training_tick = tick;
        self
    }

    /// Appends a reference image for a supported crop and marks the
    /// engine untrained. Unsupported crops are rejected without
    /// touching any state.
    pub fn add_training_image(&self, plant_type: &str, image_ref: &str) -> bool {
        let Some(plant) = PlantType::parse(plant_type) else {
            warn!(plant_type, "rejected training image for unsupported plant type");
            return false;
        };

        let mut state = self.state.write();
        if !state.plants.contains(&plant) {
            warn!(plant_type, "rejected training image for plant outside engine set");
            return false;
        }

        let images = state.corpus.entry(plant).or_default();
        images.push(image_ref.to_string());
        let total = images.len();
        state.trained = false;
        debug!(plant = plant.as_str(), total, "added training image");
        true
    }

    /// Simulated training run. Fails fast below the global image
    /// threshold and while another run is in flight; otherwise advances
    /// progress in fixed steps until 100 and flips the trained flag.
    /// The ticker is owned by this future, so dropping it cancels the
    /// run (the in-progress guard is released on drop).
    pub async fn train_model(&self) -> bool {
        {
            let mut state = self.state.write();
            let total: usize = state.corpus.values().map(Vec::len).sum();
            if total < MIN_TRAINING_IMAGES {
                warn!(
                    total,
                    required = MIN_TRAINING_IMAGES,
                    "not enough training images"
                );
                return false;
            }
            if state.training_in_progress {
                warn!("training already in progress");
                return false;
            }
            state.training_in_progress = true;
            state.progress = 0;
        }

        let guard = TrainingGuard {
            state: self.state.clone(),
        };

        loop {
            tokio::time::sleep(self.training_tick).await;
            let mut state = self.state.write();
            state.progress = state.progress.saturating_add(PROGRESS_STEP).min(100);
            debug!(progress = state.progress, "training progress");
            if state.progress >= 100 {
                state.trained = true;
                break;
            }
        }

        drop(guard);
        info!("model training completed");
        true
    }

    pub fn training_progress(&self) -> u8 {
        self.state.read().progress
    }

    pub fn is_trained(&self) -> bool {
        self.state.read().trained
    }

    pub fn snapshot(&self) -> TrainingSnapshot {
        let state = self.state.read();
        TrainingSnapshot {
            progress: state.progress,
            trained: state.trained,
            in_progress: state.training_in_progress,
            images_per_plant: state
                .corpus
                .iter()
                .map(|(plant, images)| (plant.as_str().to_string(), images.len()))
                .collect(),
        }
    }

    /// Pseudo-classification of an uploaded image. Untrained engines
    /// draw a crop uniformly; trained engines weight every crop by its
    /// corpus size plus one, so no crop is ever unreachable.
    pub fn classify_image(&self, image_ref: &str, lang: Language) -> ClassificationResult {
        let (plant, trained) = {
            let state = self.state.read();
            let mut rng = self.rng.lock();
            if state.trained {
                (weighted_plant(&state, &mut rng), true)
            } else {
                let index = rng.random_range(0..state.plants.len());
                (state.plants[index], false)
            }
        };

        let image_url = trained.then(|| image_ref.to_string());
        self.synthesize(plant, lang, image_url)
    }

    fn synthesize(
        &self,
        plant: PlantType,
        lang: Language,
        image_url: Option<String>,
    ) -> ClassificationResult {
        let mut rng = self.rng.lock();

        let confidence = 0.70 + rng.random::<f64>() * 0.25;
        let health = HealthStatus::ALL[rng.random_range(0..HealthStatus::ALL.len())];

        let mut diseases: Vec<&'static str> = Vec::new();
        let candidates = plant.disease_set();
        if health.is_disease_level() && !candidates.is_empty() {
            let draw_count = (1 + rng.random_range(0..2usize)).min(candidates.len());
            for _ in 0..draw_count {
                let candidate = candidates[rng.random_range(0..candidates.len())];
                if !diseases.contains(&candidate) {
                    diseases.push(candidate);
                }
            }
        }

        let recommendations: &[&str] = match health {
            HealthStatus::Healthy => &[locale::REC_CONTINUE_CARE],
            HealthStatus::MinorIssues => {
                &[locale::REC_CHECK_IRRIGATION, locale::REC_MONITOR_PESTS]
            }
            _ => &[
                locale::REC_APPLY_TREATMENT,
                locale::REC_CONSULT_EXPERT,
                locale::REC_ISOLATE_PLANTS,
            ],
        };

        ClassificationResult {
            plant_type: locale::plant_name(plant, lang).to_string(),
            confidence,
            health_status: locale::health_label(health, lang).to_string(),
            possible_diseases: diseases
                .iter()
                .map(|disease| locale::translate_disease(disease, lang))
                .collect(),
            recommendations: recommendations
                .iter()
                .map(|rec| locale::translate_recommendation(rec, lang))
                .collect(),
            image_url,
        }
    }
}

fn weighted_plant(state: &EngineState, rng: &mut StdRng) -> PlantType {
    // +1 keeps crops without corpus images selectable.
    let weights: Vec<usize> = state
        .plants
        .iter()
        .map(|plant| state.corpus.get(plant).map_or(0, Vec::len) + 1)
        .collect();
    let total: usize = weights.iter().sum();

    let mut draw = rng.random_range(0..total);
    for (plant, weight) in state.plants.iter().zip(&weights) {
        if draw < *weight {
            return *plant;
        }
        draw -= weight;
    }
    state.plants[0]
}

/// Clears the in-progress flag even when a run future is dropped
/// mid-flight, so a cancelled run never wedges later ones.
struct TrainingGuard {
    state: Arc<RwLock<EngineState>>,
}

impl Drop for TrainingGuard {
    fn drop(&mut self) {
        self.state.write().training_in_progress = false;
    }
}
