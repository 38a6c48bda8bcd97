use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;

use crate::config::settings::SeedingSettings;
use crate::seeding::{self, ParticipantId, PhaseInput, SeedingCriterion};

/// Offline seeding: reads a phase's results from a JSON file and prints the
/// next phase's seed order.
pub struct SeedingService {
    criteria: Vec<SeedingCriterion>,
}

impl SeedingService {
    pub fn new(settings: &SeedingSettings, override_criteria: Option<Vec<SeedingCriterion>>) -> Self {
        Self {
            criteria: override_criteria.unwrap_or_else(|| settings.default_criteria.clone()),
        }
    }

    pub fn run(&self, input: &Path) -> Result<Vec<ParticipantId>> {
        let phase = load_input(input)?;
        let results = phase.into_results();
        info!("Loaded {} participants from {}", results.len(), input.display());

        let order = seeding::rank(&results, &self.criteria)?;
        self.print(&order);
        Ok(order)
    }

    fn print(&self, order: &[ParticipantId]) {
        let chain: Vec<&str> = self.criteria.iter().map(|c| c.as_str()).collect();
        println!("{} {}", "Seeding by".bold(), chain.join(" > ").cyan());
        for (idx, participant) in order.iter().enumerate() {
            println!("{:>4}  {}", (idx + 1).to_string().green(), participant);
        }
    }
}

fn load_input(path: &Path) -> Result<PhaseInput> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse phase results in {}", path.display()))
}
