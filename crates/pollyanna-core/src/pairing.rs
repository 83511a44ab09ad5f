//! Pairing generator: two independent category draws, retried until valid.
//!
//! Each attempt draws the regular and gag assignments separately. The pair is
//! kept only if both passes succeed and no participant drew the same person
//! for both gifts; otherwise both are discarded and the whole attempt runs
//! again. Attempts are capped by [`DrawConfig::max_attempts`].

use std::collections::HashSet;

use rand::Rng;

use crate::config::DrawConfig;
use crate::error::{PairingError, Result};
use crate::history::{build_exclusion_index, ExclusionIndex, History};
use crate::matcher::match_participants;
use crate::model::{Category, Pair, PairingResult, Year, YearlyAssignment};
use crate::obs;

/// Why a single attempt was thrown away.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rejection {
    Stranded {
        category: Category,
        participant: String,
    },
    SameRecipient {
        participant: String,
    },
}

/// Reusable draw for one participant list and exclusion index.
pub struct PairingGenerator<'a> {
    participants: &'a [String],
    exclusions: ExclusionIndex,
    config: DrawConfig,
}

impl<'a> PairingGenerator<'a> {
    /// Validate inputs and derive exclusions from the window before `current_year`.
    pub fn new(
        participants: &'a [String],
        history: &History,
        config: DrawConfig,
        current_year: Year,
    ) -> Result<Self> {
        config.validate()?;
        validate_participants(participants)?;
        let exclusions = build_exclusion_index(history, config.memory_length, current_year);
        Ok(Self {
            participants,
            exclusions,
            config,
        })
    }

    pub fn exclusions(&self) -> &ExclusionIndex {
        &self.exclusions
    }

    /// Run attempts until one is valid or the cap is hit.
    ///
    /// Returns the pairing and the number of attempts it took.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(PairingResult, usize)> {
        for attempt in 1..=self.config.max_attempts {
            match self.attempt(rng) {
                Ok(result) => return Ok((result, attempt)),
                Err(Rejection::Stranded {
                    category,
                    participant,
                }) => obs::emit_match_failed(attempt, category, &participant),
                Err(Rejection::SameRecipient { participant }) => {
                    obs::emit_same_recipient_conflict(attempt, &participant)
                }
            }
        }

        Err(PairingError::InfeasibleConfiguration {
            attempts: self.config.max_attempts,
            participants: self.participants.len(),
            memory_length: self.config.memory_length,
        })
    }

    fn attempt<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> std::result::Result<PairingResult, Rejection> {
        let regular = self.match_category(Category::Regular, rng)?;
        let gag = self.match_category(Category::Gag, rng)?;

        // A successful pass assigns everyone, so only equal recipients reject here.
        self.participants
            .iter()
            .map(|name| match (regular.recipient(name), gag.recipient(name)) {
                (Some(genuine), Some(joke)) if genuine != joke => Ok((
                    name.clone(),
                    Pair {
                        regular: genuine.to_string(),
                        gag: joke.to_string(),
                    },
                )),
                _ => Err(Rejection::SameRecipient {
                    participant: name.clone(),
                }),
            })
            .collect()
    }

    fn match_category<R: Rng + ?Sized>(
        &self,
        category: Category,
        rng: &mut R,
    ) -> std::result::Result<YearlyAssignment, Rejection> {
        match_participants(self.participants, self.exclusions.for_category(category), rng).map_err(
            |err| Rejection::Stranded {
                category,
                participant: err.participant,
            },
        )
    }
}

/// Draw this year's pairing for `participants`.
///
/// Exclusions come from the `config.memory_length` years before
/// `current_year`. Fails with [`PairingError::InfeasibleConfiguration`] once
/// `config.max_attempts` full attempts have been rejected.
pub fn generate<R: Rng + ?Sized>(
    participants: &[String],
    history: &History,
    config: &DrawConfig,
    current_year: Year,
    rng: &mut R,
) -> Result<PairingResult> {
    let _span = obs::DrawSpan::enter(current_year);
    let generator = PairingGenerator::new(participants, history, *config, current_year)?;
    obs::emit_draw_started(current_year, participants.len(), config.memory_length);

    match generator.draw(rng) {
        Ok((result, attempts)) => {
            obs::emit_draw_finished(current_year, attempts);
            Ok(result)
        }
        Err(err) => {
            obs::emit_draw_exhausted(current_year, config.max_attempts);
            Err(err)
        }
    }
}

fn validate_participants(participants: &[String]) -> Result<()> {
    if participants.len() < 2 {
        return Err(PairingError::TooFewParticipants(participants.len()));
    }
    let mut seen = HashSet::with_capacity(participants.len());
    for name in participants {
        if !seen.insert(name.as_str()) {
            return Err(PairingError::DuplicateParticipant(name.clone()));
        }
    }
    Ok(())
}
