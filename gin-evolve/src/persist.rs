//! Population persistence
//!
//! A population is stored as pretty-printed JSON: generation counter, sizing,
//! id allocator and every member with its genome and record. Writes go to a
//! sibling temporary file that is then renamed over the target, so a crash
//! mid-write leaves the previous snapshot intact.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use gin_core::{Genome, GenomeId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PersistError;
use crate::population::{Member, Population};
use crate::record::GenomeRecord;

/// One stored member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMember {
    pub id: GenomeId,
    pub genome: Genome,
    pub record: GenomeRecord,
}

/// Everything needed to resume evolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub generation: u32,
    pub population_size: usize,
    pub retain_best: usize,
    /// Next id to allocate; greater than every stored id
    pub next_id: u64,
    pub members: Vec<StoredMember>,
}

impl Snapshot {
    /// Capture a population
    pub fn capture(population: &Population) -> Self {
        Self {
            generation: population.generation,
            population_size: population.config.population_size,
            retain_best: population.config.retain_count(),
            next_id: population.next_id,
            members: population
                .members
                .iter()
                .map(|(id, m)| StoredMember {
                    id: *id,
                    genome: m.genome.clone(),
                    record: m.record,
                })
                .collect(),
        }
    }

    /// Check the snapshot can be installed into a population whose genomes
    /// have `gene_count` genes
    fn validate(&self, gene_count: usize) -> Result<(), PersistError> {
        if self.population_size < 2 {
            return Err(PersistError::Inconsistent(format!(
                "population size {} is below 2",
                self.population_size
            )));
        }
        if self.retain_best == 0 || self.retain_best > self.population_size {
            return Err(PersistError::Inconsistent(format!(
                "retain_best {} outside 1..={}",
                self.retain_best, self.population_size
            )));
        }

        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert(member.id) {
                return Err(PersistError::Inconsistent(format!(
                    "duplicate genome id {}",
                    member.id
                )));
            }
            if member.id.0 >= self.next_id {
                return Err(PersistError::Inconsistent(format!(
                    "genome id {} not below next id {}",
                    member.id, self.next_id
                )));
            }
            if member.genome.len() != gene_count {
                return Err(PersistError::Inconsistent(format!(
                    "genome {} has {} genes, expected {}",
                    member.id,
                    member.genome.len(),
                    gene_count
                )));
            }
        }
        Ok(())
    }
}

impl Population {
    /// Write the population to `path`
    pub fn try_store(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(&Snapshot::capture(self))?;

        let tmp = temp_path(path);
        if let Err(e) = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Write the population to the configured storage target
    pub fn try_persist(&self) -> Result<(), PersistError> {
        let path = self.config.storage.as_deref().ok_or(PersistError::NoTarget)?;
        self.try_store(path)
    }

    /// Write the population to `path`, logging failures; returns success
    pub fn store(&self, path: &Path) -> bool {
        match self.try_store(path) {
            Ok(()) => {
                info!(path = %path.display(), generation = self.generation, "population stored");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to store population");
                false
            }
        }
    }

    /// Replace this population with the one stored at `path`.
    ///
    /// Generation counter, members and sizing all come from the file. On
    /// error the population is left untouched.
    pub fn try_load(&mut self, path: &Path) -> Result<(), PersistError> {
        let json = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&json)?;
        snapshot.validate(self.config.gene_count())?;

        self.config.population_size = snapshot.population_size;
        self.config.retain_best = Some(snapshot.retain_best);
        self.generation = snapshot.generation;
        self.next_id = snapshot.next_id;
        self.members = snapshot
            .members
            .into_iter()
            .map(|m| {
                (
                    m.id,
                    Member {
                        genome: m.genome,
                        record: m.record,
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();
        Ok(())
    }

    /// Load from `path`, logging failures; returns success
    pub fn load(&mut self, path: &Path) -> bool {
        match self.try_load(path) {
            Ok(()) => {
                info!(
                    path = %path.display(),
                    generation = self.generation,
                    members = self.members.len(),
                    "population loaded"
                );
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load population");
                false
            }
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
