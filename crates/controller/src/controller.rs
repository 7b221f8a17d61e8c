//! The provisioning state machine.

use crate::{ControllerConfig, Notice, Phase, ProvisioningError};
use simprov_core::{CardReader, CardRegistry, CardSession, CardTypeSelection, ReaderError};
use simprov_queue::ParameterQueue;
use simprov_store::CursorStore;
use simprov_types::{CardPayload, NetworkParameters, SequenceNumber};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Phase plus the data that only exists while in it.
enum Stage {
    WaitingForCard,
    Detecting,
    Erasing(Box<dyn CardSession>),
    Allocating(Box<dyn CardSession>),
    Programming(Box<dyn CardSession>, CardPayload),
    Committed(SequenceNumber),
    Aborted,
}

impl Stage {
    fn phase(&self) -> Phase {
        match self {
            Stage::WaitingForCard => Phase::WaitingForCard,
            Stage::Detecting => Phase::Detecting,
            Stage::Erasing(_) => Phase::Erasing,
            Stage::Allocating(_) => Phase::Allocating,
            Stage::Programming(..) => Phase::Programming,
            Stage::Committed(_) => Phase::Committed,
            Stage::Aborted => Phase::Aborted,
        }
    }
}

/// Drives cards through detect, erase, allocate, program and commit.
///
/// The controller owns the reader and the cursor store for the duration of
/// the run. It is single-threaded: each [`step`](Self::step) performs one
/// transition, and only `WaitingForCard` blocks.
pub struct ProvisioningController<R, S> {
    config: ControllerConfig,
    /// Current selection. `auto_once` is replaced by the detected type.
    selection: CardTypeSelection,
    registry: CardRegistry,
    queue: ParameterQueue,
    network: NetworkParameters,
    store: S,
    reader: R,
    stage: Stage,
    new_card_only: bool,
    committed: Vec<SequenceNumber>,
    failed_cards: usize,
    skipped_cards: usize,
}

impl<R: CardReader, S: CursorStore> ProvisioningController<R, S> {
    /// Create a controller waiting for its first card.
    ///
    /// Fails with [`ProvisioningError::UnknownCardType`] if the configured
    /// card type is not registered, before the reader is touched.
    pub fn new(
        config: ControllerConfig,
        registry: CardRegistry,
        queue: ParameterQueue,
        network: NetworkParameters,
        store: S,
        reader: R,
    ) -> Result<Self, ProvisioningError> {
        registry.validate(&config.card_type)?;

        info!(
            card_type = %config.card_type,
            erase = config.erase,
            batch_mode = config.batch_mode,
            retry_failed_cards = config.retry_failed_cards,
            next_write_number = %store.next_write_number(),
            remaining = queue.remaining_from(store.next_write_number()),
            "Provisioning controller ready"
        );

        Ok(Self {
            selection: config.card_type.clone(),
            config,
            registry,
            queue,
            network,
            store,
            reader,
            stage: Stage::WaitingForCard,
            new_card_only: false,
            committed: Vec::new(),
            failed_cards: 0,
            skipped_cards: 0,
        })
    }

    /// Perform one transition and return the phase entered.
    ///
    /// An error moves the controller to [`Phase::Aborted`]. Stepping an
    /// aborted controller does nothing.
    pub fn step(&mut self, notify: &mut dyn FnMut(&Notice)) -> Result<Phase, ProvisioningError> {
        let stage = std::mem::replace(&mut self.stage, Stage::Aborted);
        let from = stage.phase();
        if from.is_terminal() {
            return Ok(Phase::Aborted);
        }

        match self.transition(stage, notify) {
            Ok(next) => {
                debug!(from = %from, to = %next.phase(), "Phase transition");
                self.stage = next;
                Ok(self.stage.phase())
            }
            Err(err) => {
                error!(
                    phase = %from,
                    next_write_number = %self.store.next_write_number(),
                    error = %err,
                    "Provisioning aborted"
                );
                Err(err)
            }
        }
    }

    /// Step until the run stops.
    ///
    /// Operator cancellation ends the run with `Ok`; every other stop is an
    /// error.
    pub fn run(&mut self, mut notify: impl FnMut(&Notice)) -> Result<RunSummary, ProvisioningError> {
        while !self.step(&mut notify)?.is_terminal() {}
        let summary = self.summary();
        info!(
            committed = summary.committed.len(),
            failed_cards = summary.failed_cards,
            skipped_cards = summary.skipped_cards,
            next_write_number = %summary.next_write_number,
            "Provisioning run finished"
        );
        Ok(summary)
    }

    fn transition(
        &mut self,
        stage: Stage,
        notify: &mut dyn FnMut(&Notice),
    ) -> Result<Stage, ProvisioningError> {
        let slot = self.store.next_write_number();
        match stage {
            Stage::WaitingForCard => {
                notify(&Notice::InsertCard {
                    new_card_only: self.new_card_only,
                });
                match self.reader.wait_for_card(self.new_card_only) {
                    Ok(()) => {
                        self.new_card_only = true;
                        Ok(Stage::Detecting)
                    }
                    Err(ReaderError::Cancelled) => {
                        info!(next_write_number = %slot, "Cancelled while waiting for card");
                        notify(&Notice::Stopped);
                        Ok(Stage::Aborted)
                    }
                    Err(source) => Err(ProvisioningError::Reader { slot, source }),
                }
            }

            Stage::Detecting => {
                let Some(session) = self.detect(slot, notify)? else {
                    return Ok(Stage::WaitingForCard);
                };
                if self.config.erase {
                    Ok(Stage::Erasing(session))
                } else {
                    Ok(Stage::Allocating(session))
                }
            }

            Stage::Erasing(mut session) => {
                notify(&Notice::Formatting);
                info!(sequence = %slot, card_type = session.card_type(), "Erasing card");
                let erased = session
                    .erase(&mut self.reader)
                    .and_then(|()| session.reset(&mut self.reader));
                match erased {
                    Ok(()) => Ok(Stage::Allocating(session)),
                    Err(source) => {
                        self.card_failed(ProvisioningError::EraseFailed { slot, source }, notify)
                    }
                }
            }

            Stage::Allocating(session) => {
                let record = self.queue.get(slot)?;
                let payload = CardPayload::merge(&self.network, record);
                debug!(sequence = %slot, iccid = %payload.iccid, "Allocated identity record");
                notify(&Notice::Allocated(payload.clone()));
                Ok(Stage::Programming(session, payload))
            }

            Stage::Programming(mut session, payload) => {
                notify(&Notice::Programming {
                    sequence_number: payload.sequence_number,
                });
                info!(
                    sequence = %payload.sequence_number,
                    card_type = session.card_type(),
                    "Programming card"
                );
                match session.program(&mut self.reader, &payload) {
                    Ok(()) => Ok(Stage::Committed(payload.sequence_number)),
                    Err(source) => self.card_failed(
                        ProvisioningError::ProgramFailed {
                            slot: payload.sequence_number,
                            source,
                        },
                        notify,
                    ),
                }
            }

            Stage::Committed(sequence_number) => {
                self.store.advance();
                self.store
                    .save()
                    .map_err(|source| ProvisioningError::Persist {
                        slot: sequence_number,
                        source,
                    })?;
                self.committed.push(sequence_number);

                let next_write_number = self.store.next_write_number();
                info!(
                    sequence = %sequence_number,
                    next_write_number = %next_write_number,
                    "Card committed"
                );
                notify(&Notice::CardWritten {
                    sequence_number,
                    next_write_number,
                });
                Ok(Stage::WaitingForCard)
            }

            Stage::Aborted => Ok(Stage::Aborted),
        }
    }

    /// Bind a session to the inserted card.
    ///
    /// `Ok(None)` means the card was skipped and another one is needed.
    fn detect(
        &mut self,
        slot: SequenceNumber,
        notify: &mut dyn FnMut(&Notice),
    ) -> Result<Option<Box<dyn CardSession>>, ProvisioningError> {
        if let CardTypeSelection::Named(name) = &self.selection {
            let session = self.registry.driver(name)?.bind();
            debug!(card_type = session.card_type(), "Using configured card type");
            notify(&Notice::CardTypeResolved {
                card_type: session.card_type().to_string(),
                detected: false,
            });
            return Ok(Some(session));
        }

        let detected = self
            .registry
            .autodetect(&mut self.reader)
            .map_err(|source| ProvisioningError::Card {
                phase: Phase::Detecting,
                slot,
                source,
            })?;

        let Some(mut session) = detected else {
            if self.config.batch_mode {
                warn!(sequence = %slot, "No card type matches the inserted card, skipping it");
                self.skipped_cards += 1;
                notify(&Notice::DetectionFailed);
                return Ok(None);
            }
            return Err(ProvisioningError::DetectionFailed { slot });
        };

        session
            .reset(&mut self.reader)
            .map_err(|source| ProvisioningError::Card {
                phase: Phase::Detecting,
                slot,
                source,
            })?;

        if self.selection == CardTypeSelection::AutoOnce {
            info!(card_type = session.card_type(), "Pinning detected card type for the rest of the run");
            self.selection = CardTypeSelection::Named(session.card_type().to_string());
        }

        notify(&Notice::CardTypeResolved {
            card_type: session.card_type().to_string(),
            detected: true,
        });
        Ok(Some(session))
    }

    /// Retry a failed card on a new one, or abort.
    fn card_failed(
        &mut self,
        err: ProvisioningError,
        notify: &mut dyn FnMut(&Notice),
    ) -> Result<Stage, ProvisioningError> {
        if !self.config.retry_failed_cards {
            return Err(err);
        }

        let sequence_number = self.store.next_write_number();
        warn!(sequence = %sequence_number, error = %err, "Card failed, retrying with a new card");
        self.failed_cards += 1;
        notify(&Notice::CardFailed {
            sequence_number,
            reason: err.to_string(),
        });
        Ok(Stage::WaitingForCard)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.stage.phase()
    }

    /// Current card type selection (after any `auto_once` pinning).
    pub fn selection(&self) -> &CardTypeSelection {
        &self.selection
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Sequence numbers committed during this run, in order.
    pub fn committed(&self) -> &[SequenceNumber] {
        &self.committed
    }

    /// Progress so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            committed: self.committed.clone(),
            failed_cards: self.failed_cards,
            skipped_cards: self.skipped_cards,
            next_write_number: self.store.next_write_number(),
        }
    }

    /// Give back the reader and the store.
    pub fn into_parts(self) -> (R, S) {
        (self.reader, self.store)
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Sequence numbers committed, in order.
    pub committed: Vec<SequenceNumber>,
    /// Cards that failed erase or program and were replaced.
    pub failed_cards: usize,
    /// Cards skipped because no card type matched (batch mode).
    pub skipped_cards: usize,
    pub next_write_number: SequenceNumber,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} card(s) written", self.committed.len())?;
        if let (Some(first), Some(last)) = (self.committed.first(), self.committed.last()) {
            write!(f, " ({}..{})", first, last)?;
        }
        if self.failed_cards > 0 {
            write!(f, ", {} failed", self.failed_cards)?;
        }
        if self.skipped_cards > 0 {
            write!(f, ", {} skipped", self.skipped_cards)?;
        }
        write!(f, ", next sequence number {}", self.next_write_number)
    }
}
