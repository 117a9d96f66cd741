//! Combat session: the phase state machine of one encounter.
//!
//! A [`CombatSession`] owns its combatants, the status registry and the
//! per-phase bookkeeping. Every command is validated against the current
//! phase and target before anything is written, so a rejected command leaves
//! the session exactly as it was.
//!
//! ```text
//! initiate_combat ─▶ Ranged ─end_ranged_phase─▶ Block ─end_block_phase─┬─▶ Damage ─resolve_remainder─┐
//!                                                                        └───────────────────────────────┴─▶ Attack ─submit_attack─▶ Complete
//! ```
//!
//! `retreat` ends the encounter from any active phase.

mod command;
mod events;
mod outcome;
mod phase;
mod roster;

pub use command::{CombatCommand, CommandKind};
pub use events::{CombatEvent, DamageSource};
pub use outcome::{CombatResult, CommandOutcome, EncounterOutcome, OutcomeData};
pub use phase::Phase;
pub use roster::Roster;

use std::collections::{BTreeMap, VecDeque};
use std::str::FromStr;

use tracing::{debug, error};

use crate::config::CombatConfig;
use crate::env::EnemyOracle;
use crate::error::{AssignmentViolation, CombatError, CommandError, ConfigError};
use crate::model::{
    AbilityPhase, CombatantId, Conditions, Element, Enemy, EnemyAbilities, EnemyDefinition,
    EnemyId, Hero, StrikeKind, Unit, UnitId, UnitState,
};
use crate::resolver::{
    BlockContribution, BlockEfficiency, StrikeContext, assess_block, current_armor,
    resolve_strike, vampiric_heal,
};
use crate::status::{StatusEffectKind, StatusEffectManager, StatusTick, TargetLookup};

type CommandResult = Result<(&'static str, OutcomeData), CommandError>;

/// Everything needed to start an encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSetup {
    pub hero: Hero,
    /// Enemies in roster order. Ids are assigned from their position.
    pub enemies: Vec<EnemyDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub units: Vec<Unit>,
}

/// Raw points submitted during each phase of the current encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseTotals {
    pub ranged: u32,
    pub siege: u32,
    pub block: u32,
    pub attack: u32,
}

/// Block credited to one enemy during the block phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockStatus {
    pub effective: u32,
    pub blocked: bool,
    pub efficiency: BlockEfficiency,
}

/// Unblocked wounds from one enemy awaiting assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingDamage {
    pub source: EnemyId,
    /// Wounds not yet assigned.
    pub wounds: u32,
    /// Wounds that landed on a unit so far.
    pub delivered: u32,
}

/// One combat encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    config: CombatConfig,
    phase: Phase,
    roster: Roster,
    blocks: BTreeMap<EnemyId, BlockStatus>,
    /// Effective ranged and siege points credited per enemy this phase.
    ranged_credit: BTreeMap<EnemyId, u32>,
    totals: PhaseTotals,
    pending: Vec<PendingDamage>,
    /// Attack points granted by unit activations, spent by the next attack.
    attack_bonus: u32,
    status: StatusEffectManager,
    defeated: Vec<EnemyId>,
    fame_gained: u32,
    wounds_received: u32,
    poison_wounds: u32,
    result: Option<CombatResult>,
    events: VecDeque<CombatEvent>,
}

impl Default for CombatSession {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}

impl CombatSession {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            phase: Phase::NotInCombat,
            roster: Roster::default(),
            blocks: BTreeMap::new(),
            ranged_credit: BTreeMap::new(),
            totals: PhaseTotals::default(),
            pending: Vec::new(),
            attack_bonus: 0,
            status: StatusEffectManager::new(),
            defeated: Vec::new(),
            fame_gained: 0,
            wounds_received: 0,
            poison_wounds: 0,
            result: None,
            events: VecDeque::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn hero(&self) -> &Hero {
        &self.roster.hero
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.roster.enemies
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.roster.enemy(id)
    }

    pub fn units(&self) -> &[Unit] {
        &self.roster.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.roster.unit(id)
    }

    pub fn status(&self) -> &StatusEffectManager {
        &self.status
    }

    pub fn totals(&self) -> PhaseTotals {
        self.totals
    }

    pub fn block_status(&self, id: EnemyId) -> Option<&BlockStatus> {
        self.blocks.get(&id)
    }

    pub fn pending_damage(&self) -> &[PendingDamage] {
        &self.pending
    }

    pub fn defeated(&self) -> &[EnemyId] {
        &self.defeated
    }

    pub fn result(&self) -> Option<&CombatResult> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<CombatResult> {
        self.result.take()
    }

    /// Removes and returns every buffered event, oldest first.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.events.drain(..).collect()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Starts a new encounter.
    ///
    /// Summoners bring in their summoned enemy immediately; summoned enemies
    /// are appended to the roster and cannot be targeted before the block
    /// phase. Any status effect left over from a previous encounter is
    /// removed with its remove hook.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a summoned enemy has no definition or the
    /// roster exceeds its bounds. Starting while an encounter is running is a
    /// player error and comes back as a rejected outcome instead.
    pub fn initiate_combat(
        &mut self,
        setup: EncounterSetup,
        oracle: &dyn EnemyOracle,
    ) -> Result<CommandOutcome, ConfigError> {
        let kind = CommandKind::InitiateCombat;
        if !kind.valid_in(self.phase) {
            return Ok(self.invalid_phase(kind));
        }

        let EncounterSetup {
            hero,
            enemies: definitions,
            units,
        } = setup;

        if units.len() > CombatConfig::MAX_UNITS {
            error!(units = units.len(), "unit roster overflow");
            return Err(ConfigError::RosterOverflow {
                max: CombatConfig::MAX_UNITS,
            });
        }

        let mut enemies: Vec<Enemy> = definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| Enemy::from_definition(EnemyId(index as u32), definition))
            .collect();

        let mut summoned = Vec::new();
        for (index, definition) in definitions.iter().enumerate() {
            if !definition.abilities.contains(EnemyAbilities::SUMMONER) {
                continue;
            }
            let key = definition
                .summons
                .as_deref()
                .ok_or_else(|| ConfigError::MissingEnemyDefinition(format!("{}.summons", definition.key)))?;
            let Some(summon) = oracle.definition(key) else {
                error!(summoner = %definition.key, key, "summoned enemy has no definition");
                return Err(ConfigError::MissingEnemyDefinition(key.to_owned()));
            };
            let id = EnemyId((enemies.len() + summoned.len()) as u32);
            summoned.push(Enemy::summoned(
                id,
                &summon,
                EnemyId(index as u32),
                Phase::Ranged,
            ));
        }
        enemies.extend(summoned);

        if enemies.len() > CombatConfig::MAX_ENEMIES {
            error!(enemies = enemies.len(), "enemy roster overflow");
            return Err(ConfigError::RosterOverflow {
                max: CombatConfig::MAX_ENEMIES,
            });
        }

        self.status.clear(&mut self.roster);
        let previous = self.phase;
        *self = Self {
            config: self.config.clone(),
            roster: Roster::new(hero, enemies, units),
            phase: Phase::Ranged,
            events: core::mem::take(&mut self.events),
            ..Self::new(CombatConfig::default())
        };

        let ids = self.roster.enemy_ids();
        let summons: Vec<(EnemyId, EnemyId)> = self
            .roster
            .enemies
            .iter()
            .filter_map(|e| e.summoned_by.map(|summoner| (summoner, e.id)))
            .collect();

        self.push_event(CombatEvent::CombatStarted {
            enemies: ids.clone(),
        });
        for &(summoner, summoned) in &summons {
            self.push_event(CombatEvent::EnemySummoned { summoner, summoned });
        }
        self.push_event(CombatEvent::PhaseChanged {
            from: previous,
            to: Phase::Ranged,
        });

        debug!(
            enemies = ids.len(),
            summoned = summons.len(),
            units = self.roster.units.len(),
            "combat initiated"
        );

        Ok(CommandOutcome::succeeded(
            self.phase,
            "combat.started",
            OutcomeData::CombatStarted {
                enemies: ids,
                summoned: summons.into_iter().map(|(_, id)| id).collect(),
            },
        ))
    }

    /// Applies ranged and siege points to one enemy.
    ///
    /// Points accumulate per enemy for the rest of the ranged phase. Plain
    /// ranged points against a fortified enemy have no effect.
    pub fn submit_ranged(
        &mut self,
        target: EnemyId,
        ranged: u32,
        siege: u32,
        element: Element,
    ) -> CommandOutcome {
        self.run(CommandKind::SubmitRanged, |session| {
            session.apply_ranged(target, ranged, siege, element, true)
        })
    }

    pub fn end_ranged_phase(&mut self) -> CommandOutcome {
        self.run(CommandKind::EndRangedPhase, Self::apply_end_ranged)
    }

    /// Credits block against one enemy. Contributions beyond the maximum
    /// submission size are ignored.
    pub fn submit_block(
        &mut self,
        target: EnemyId,
        contributions: &[BlockContribution],
    ) -> CommandOutcome {
        self.run(CommandKind::SubmitBlock, |session| {
            session.apply_block(target, contributions)
        })
    }

    /// Commits the block phase. Every unblocked, non-stunned enemy queues
    /// its damage; the session then waits in `Damage` for assignment, or
    /// moves straight to `Attack` if nothing got through.
    pub fn end_block_phase(&mut self) -> CommandOutcome {
        self.run(CommandKind::EndBlockPhase, Self::apply_end_block)
    }

    /// Routes one pending wound from `source` to `unit`.
    pub fn assign_damage(&mut self, unit: UnitId, source: EnemyId) -> CommandOutcome {
        self.run(CommandKind::AssignDamage, |session| {
            session.apply_assignment(unit, source)
        })
    }

    /// Sends every unassigned wound to the hero and moves to `Attack`.
    pub fn resolve_remainder(&mut self) -> CommandOutcome {
        self.run(CommandKind::ResolveRemainder, Self::apply_remainder)
    }

    /// Spends attack points on the remaining enemies and ends the encounter.
    ///
    /// Enemies are considered in ascending order of current armor; each one
    /// whose cost fits in the remaining pool is defeated. Leftover points are
    /// discarded.
    pub fn submit_attack(&mut self, total: u32, element: Element) -> CommandOutcome {
        self.run(CommandKind::SubmitAttack, |session| {
            session.apply_attack(total, element)
        })
    }

    /// Exhausts a ready unit to use one of its abilities in the current phase.
    pub fn activate_unit(
        &mut self,
        unit: UnitId,
        ability: usize,
        target: Option<EnemyId>,
    ) -> CommandOutcome {
        self.run(CommandKind::ActivateUnit, |session| {
            session.apply_activation(unit, ability, target)
        })
    }

    pub fn apply_status(&mut self, target: CombatantId, kind: StatusEffectKind) -> CommandOutcome {
        self.run(CommandKind::ApplyStatus, |session| {
            session.apply_status_effect(target, kind)
        })
    }

    /// Applies a status effect named by a content key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEffectType`] if `key` names no effect.
    pub fn apply_status_by_key(
        &mut self,
        target: CombatantId,
        key: &str,
    ) -> Result<CommandOutcome, ConfigError> {
        let kind = StatusEffectKind::from_str(key).map_err(|_| {
            error!(key, "unknown status effect type");
            ConfigError::UnknownEffectType(key.to_owned())
        })?;
        Ok(self.apply_status(target, kind))
    }

    pub fn retreat(&mut self) -> CommandOutcome {
        self.run(CommandKind::Retreat, |session| {
            let result = session.finish(EncounterOutcome::Retreated);
            Ok(("combat.retreated", OutcomeData::CombatEnded(result)))
        })
    }

    /// Dispatches a command to its handler.
    pub fn execute(&mut self, command: &CombatCommand) -> CommandOutcome {
        match command {
            CombatCommand::SubmitRanged {
                target,
                ranged,
                siege,
                element,
            } => self.submit_ranged(*target, *ranged, *siege, *element),
            CombatCommand::EndRangedPhase => self.end_ranged_phase(),
            CombatCommand::SubmitBlock {
                target,
                contributions,
            } => self.submit_block(*target, contributions),
            CombatCommand::EndBlockPhase => self.end_block_phase(),
            CombatCommand::AssignDamage { unit, source } => self.assign_damage(*unit, *source),
            CombatCommand::ResolveRemainder => self.resolve_remainder(),
            CombatCommand::SubmitAttack { total, element } => self.submit_attack(*total, *element),
            CombatCommand::ActivateUnit {
                unit,
                ability,
                target,
            } => self.activate_unit(*unit, *ability, *target),
            CombatCommand::ApplyStatus { target, effect } => self.apply_status(*target, *effect),
            CombatCommand::Retreat => self.retreat(),
        }
    }

    // ========================================================================
    // Handlers
    //
    // Each handler validates everything it needs before its first write.
    // ========================================================================

    fn run(
        &mut self,
        kind: CommandKind,
        handler: impl FnOnce(&mut Self) -> CommandResult,
    ) -> CommandOutcome {
        if !kind.valid_in(self.phase) {
            return self.invalid_phase(kind);
        }
        match handler(self) {
            Ok((message, data)) => {
                debug!(command = %kind, phase = %self.phase, key = message, "command applied");
                CommandOutcome::succeeded(self.phase, message, data)
            }
            Err(error) => self.reject(kind, error),
        }
    }

    fn invalid_phase(&self, command: CommandKind) -> CommandOutcome {
        self.reject(
            command,
            CommandError::InvalidPhaseOperation {
                command,
                phase: self.phase,
            },
        )
    }

    fn reject(&self, command: CommandKind, error: CommandError) -> CommandOutcome {
        debug!(
            %command,
            phase = %self.phase,
            code = error.error_code(),
            severity = error.severity().as_str(),
            %error,
            "command rejected"
        );
        CommandOutcome::rejected(self.phase, error)
    }

    fn targetable_enemy(&self, id: EnemyId) -> Result<&Enemy, CommandError> {
        let enemy = self
            .roster
            .enemy(id)
            .ok_or(CommandError::EnemyNotFound(id))?;
        if !enemy.is_targetable_in(self.phase) {
            return Err(CommandError::EnemyNotTargetable(id));
        }
        Ok(enemy)
    }

    fn is_blocked(&self, id: EnemyId) -> bool {
        self.blocks.get(&id).is_some_and(|b| b.blocked)
    }

    fn apply_ranged(
        &mut self,
        target: EnemyId,
        ranged: u32,
        siege: u32,
        element: Element,
        from_hero: bool,
    ) -> CommandResult {
        if from_hero && self.roster.hero.conditions.is_stunned() {
            return Err(CommandError::HeroCannotAct);
        }
        if ranged == 0 && siege == 0 {
            return Err(CommandError::EmptySubmission);
        }
        let enemy = self.targetable_enemy(target)?;

        let (ranged_points, siege_points) = if from_hero {
            hero_points(&self.roster.hero.conditions, ranged, siege)
        } else {
            (ranged, siege)
        };
        let ranged_strike = resolve_strike(
            enemy,
            &StrikeContext::new(StrikeKind::Ranged, element, false),
            ranged_points,
        );
        let siege_strike = resolve_strike(
            enemy,
            &StrikeContext::new(StrikeKind::Siege, element, false),
            siege_points,
        );
        let cost = siege_strike.cost();

        self.totals.ranged = self.totals.ranged.saturating_add(ranged);
        self.totals.siege = self.totals.siege.saturating_add(siege);

        if ranged_strike.immune && siege == 0 {
            return Ok((
                "combat.ranged.fortified",
                OutcomeData::RangedResolved {
                    target,
                    applied: 0,
                    fortified_immune: true,
                    defeated: false,
                    fame: 0,
                },
            ));
        }

        let applied = ranged_strike.points.saturating_add(siege_strike.points);
        let credit = self.ranged_credit.entry(target).or_default();
        *credit = credit.saturating_add(applied);
        let defeated = *credit >= cost;
        let fame = if defeated {
            self.defeat_enemy(target)
        } else {
            0
        };

        Ok((
            if defeated {
                "combat.ranged.defeated"
            } else {
                "combat.ranged.damaged"
            },
            OutcomeData::RangedResolved {
                target,
                applied,
                fortified_immune: false,
                defeated,
                fame,
            },
        ))
    }

    fn apply_end_ranged(&mut self) -> CommandResult {
        self.ranged_credit.clear();
        if self.roster.enemies.is_empty() {
            let result = self.finish(EncounterOutcome::Victory);
            return Ok(("combat.victory", OutcomeData::CombatEnded(result)));
        }
        self.enter_phase(Phase::Block);
        Ok(self.phase_entry_outcome("combat.phase.block", OutcomeData::None))
    }

    fn apply_block(&mut self, target: EnemyId, contributions: &[BlockContribution]) -> CommandResult {
        let contributions =
            &contributions[..contributions.len().min(CombatConfig::MAX_BLOCK_CONTRIBUTIONS)];
        if contributions.iter().all(|c| c.value == 0) {
            return Err(CommandError::EmptySubmission);
        }
        let enemy = self.targetable_enemy(target)?;
        if self.is_blocked(target) {
            return Err(CommandError::EnemyAlreadyBlocked(target));
        }

        let prior = self.blocks.get(&target);
        let hero = &self.roster.hero;
        let assessment = assess_block(
            enemy,
            contributions,
            prior.map_or(0, |b| b.effective),
            &hero.conditions,
            hero.movement_points,
            self.config.cumbersome_rate,
        );
        let efficiency = match prior {
            Some(BlockStatus {
                efficiency: BlockEfficiency::Inefficient,
                ..
            }) => BlockEfficiency::Inefficient,
            _ => assessment.efficiency,
        };

        self.roster.hero.movement_points -= assessment.movement_used;
        self.blocks.insert(
            target,
            BlockStatus {
                effective: assessment.effective,
                blocked: assessment.blocked,
                efficiency,
            },
        );
        self.totals.block = contributions
            .iter()
            .fold(self.totals.block, |sum, c| sum.saturating_add(c.value));
        self.push_event(CombatEvent::BlockPerformed {
            enemy: target,
            effective: assessment.effective,
            blocked: assessment.blocked,
        });

        Ok((
            assessment.message_key(),
            OutcomeData::BlockResolved { target, assessment },
        ))
    }

    fn apply_end_block(&mut self) -> CommandResult {
        let mut unblocked = Vec::new();
        let mut pending = Vec::new();
        for enemy in &self.roster.enemies {
            if self.is_blocked(enemy.id) {
                continue;
            }
            if enemy.conditions.is_stunned() {
                debug!(enemy = %enemy.id, "stunned enemy deals no damage");
                continue;
            }
            let strike = resolve_strike(
                enemy,
                &StrikeContext::new(StrikeKind::Melee, enemy.attack_element, false),
                0,
            );
            let wounds = enemy.conditions.outgoing_attack(strike.enemy_attack);
            unblocked.push(enemy.id);
            if wounds > 0 {
                pending.push(PendingDamage {
                    source: enemy.id,
                    wounds,
                    delivered: 0,
                });
            }
        }

        let pending_wounds: u32 = pending.iter().map(|p| p.wounds).sum();
        debug!(
            unblocked = unblocked.len(),
            pending_wounds, "block phase committed"
        );
        self.pending = pending;

        let next = if self.pending.is_empty() {
            Phase::Attack
        } else {
            Phase::Damage
        };
        self.enter_phase(next);

        let data = OutcomeData::PhaseEnded {
            unblocked,
            pending_wounds,
            waiting_for_assignment: self.phase == Phase::Damage,
        };
        Ok(self.phase_entry_outcome("combat.block.committed", data))
    }

    fn apply_assignment(&mut self, unit_id: UnitId, source: EnemyId) -> CommandResult {
        let index = self
            .pending
            .iter()
            .position(|p| p.source == source && p.wounds > 0)
            .ok_or(CommandError::NoPendingDamage(source))?;
        let unit = self
            .roster
            .unit(unit_id)
            .ok_or(CommandError::UnitNotFound(unit_id))?;
        let enemy = self
            .roster
            .enemy(source)
            .ok_or(CommandError::EnemyNotFound(source))?;

        let violation = if enemy.has(EnemyAbilities::ASSASSIN) {
            Some(AssignmentViolation::AssassinSource)
        } else if !unit.is_ready() {
            Some(AssignmentViolation::UnitNotReady)
        } else {
            None
        };
        if let Some(reason) = violation {
            return Err(CommandError::IllegalDamageAssignment {
                unit: unit_id,
                source_enemy: source,
                reason,
            });
        }
        let lethal = enemy.has(EnemyAbilities::POISON) || enemy.has(EnemyAbilities::PARALYZE);

        let target = CombatantId::Unit(unit_id);
        let entry = &mut self.pending[index];
        entry.wounds -= 1;
        let wounds_left = entry.wounds;

        let (landed, unit_state, unit_armor) = match self.roster.unit_mut(unit_id) {
            Some(unit) => {
                let landed = self.status.on_damage_taken(target, 1, unit);
                let state = if landed > 0 {
                    unit.take_wound(lethal)
                } else {
                    unit.state
                };
                (landed, state, unit.armor)
            }
            None => (0, UnitState::Destroyed, 0),
        };
        self.pending[index].delivered = self.pending[index].delivered.saturating_add(landed);
        if landed > 0 {
            self.push_event(CombatEvent::DamageApplied {
                target,
                amount: landed,
                source: DamageSource::Enemy(source),
            });
        }

        Ok((
            if unit_state == UnitState::Destroyed {
                "combat.damage.unit_destroyed"
            } else {
                "combat.damage.unit_wounded"
            },
            OutcomeData::DamageAssigned {
                unit: unit_id,
                source,
                unit_state,
                unit_armor,
                wounds_left,
            },
        ))
    }

    fn apply_remainder(&mut self) -> CommandResult {
        let pending = core::mem::take(&mut self.pending);
        let mut wounds_received: u32 = 0;
        let mut poison_wounds: u32 = 0;
        let mut paralyze_triggered = false;
        let mut cards_discarded = 0;

        for entry in &pending {
            let Some(enemy) = self.roster.enemy(entry.source) else {
                continue;
            };
            let poisonous = enemy.has(EnemyAbilities::POISON);
            let paralyzing = enemy.has(EnemyAbilities::PARALYZE);

            let mut delivered = entry.delivered;
            if entry.wounds > 0 {
                let taken = self.deal_damage(
                    CombatantId::Hero,
                    entry.wounds,
                    DamageSource::Enemy(entry.source),
                );
                delivered = delivered.saturating_add(taken);
                wounds_received = wounds_received.saturating_add(taken);

                if poisonous && taken > 0 {
                    let hero = &mut self.roster.hero;
                    hero.discarded_wounds = hero.discarded_wounds.saturating_add(taken);
                    self.poison_wounds = self.poison_wounds.saturating_add(taken);
                    poison_wounds = poison_wounds.saturating_add(taken);
                }
            }
            // wounds routed to units count; one discard per resolution
            if paralyzing && delivered > 0 && !paralyze_triggered {
                cards_discarded = self.roster.hero.discard_non_wounds();
                paralyze_triggered = true;
            }

            if let Some(enemy) = self.roster.enemy_mut(entry.source) {
                let heal = vampiric_heal(enemy, delivered, &self.config);
                if heal > 0 {
                    enemy.armor_bonus = enemy.armor_bonus.saturating_add(heal);
                    debug!(enemy = %entry.source, heal, "vampiric heal");
                }
            }
        }

        debug!(
            wounds_received,
            poison_wounds, paralyze_triggered, "damage resolved"
        );
        self.enter_phase(Phase::Attack);

        let data = OutcomeData::DamageResolved {
            wounds_received,
            poison_wounds,
            paralyze_triggered,
            cards_discarded,
        };
        Ok(self.phase_entry_outcome("combat.damage.resolved", data))
    }

    fn apply_attack(&mut self, total: u32, element: Element) -> CommandResult {
        if self.roster.hero.conditions.is_stunned() {
            return Err(CommandError::HeroCannotAct);
        }

        let mut order: Vec<(EnemyId, u32, u32)> = self
            .roster
            .enemies
            .iter()
            .filter(|e| e.is_targetable_in(self.phase))
            .map(|e| {
                let ctx = StrikeContext::new(StrikeKind::Melee, element, self.is_blocked(e.id));
                let strike = resolve_strike(e, &ctx, 0);
                (e.id, strike.armor, strike.raw_cost())
            })
            .collect();
        order.sort_by_key(|&(_, armor, _)| armor);

        let mut pool = self
            .roster
            .hero
            .conditions
            .outgoing_attack(total)
            .saturating_add(self.attack_bonus);
        let mut defeated = Vec::new();
        for (id, _, cost) in order {
            if pool >= cost {
                pool -= cost;
                defeated.push(id);
            }
        }

        self.totals.attack = self.totals.attack.saturating_add(total);
        self.attack_bonus = 0;
        let fame: u32 = defeated.iter().map(|&id| self.defeat_enemy(id)).sum();
        debug!(
            defeated = defeated.len(),
            discarded = pool,
            "attack resolved"
        );

        let victory = self.roster.enemies.is_empty();
        let result = self.finish(if victory {
            EncounterOutcome::Victory
        } else {
            EncounterOutcome::Defeat
        });

        Ok((
            if result.outcome == EncounterOutcome::Victory {
                "combat.victory"
            } else {
                "combat.defeat"
            },
            OutcomeData::AttackResolved {
                enemies_defeated: defeated,
                fame,
                discarded: pool,
                victory: result.outcome == EncounterOutcome::Victory,
            },
        ))
    }

    fn apply_activation(
        &mut self,
        unit_id: UnitId,
        index: usize,
        target: Option<EnemyId>,
    ) -> CommandResult {
        let unit = self
            .roster
            .unit(unit_id)
            .ok_or(CommandError::UnitNotFound(unit_id))?;
        if !unit.is_ready() {
            return Err(CommandError::UnitNotReady(unit_id));
        }
        let ability = unit
            .abilities
            .get(index)
            .copied()
            .filter(|a| ability_usable_in(a.phase, self.phase))
            .ok_or(CommandError::AbilityNotAvailable {
                unit: unit_id,
                index,
            })?;
        let value = match ability.phase {
            AbilityPhase::Block => ability.value,
            _ => unit.conditions.outgoing_attack(ability.value),
        };

        let (_, effect) = match ability.phase {
            AbilityPhase::Ranged => {
                let target = target.ok_or(CommandError::MissingTarget)?;
                self.apply_ranged(target, value, 0, ability.element, false)?
            }
            AbilityPhase::Siege => {
                let target = target.ok_or(CommandError::MissingTarget)?;
                self.apply_ranged(target, 0, value, ability.element, false)?
            }
            AbilityPhase::Block => {
                let target = target.ok_or(CommandError::MissingTarget)?;
                self.apply_block(target, &[BlockContribution::unit(value, ability.element)])?
            }
            AbilityPhase::Attack => {
                self.attack_bonus = self.attack_bonus.saturating_add(value);
                ("combat.unit.attack_bonus", OutcomeData::None)
            }
        };

        if let Some(unit) = self.roster.unit_mut(unit_id) {
            unit.state = UnitState::Exhausted;
        }
        Ok((
            "combat.unit.activated",
            OutcomeData::UnitActivated {
                unit: unit_id,
                ability: ability.phase,
                value,
                effect: Box::new(effect),
            },
        ))
    }

    fn apply_status_effect(&mut self, target: CombatantId, kind: StatusEffectKind) -> CommandResult {
        let Some(combatant) = self.roster.target_mut(target) else {
            return Err(match target {
                CombatantId::Enemy(id) => CommandError::EnemyNotFound(id),
                CombatantId::Unit(id) => CommandError::UnitNotFound(id),
                // the hero is always on the roster
                CombatantId::Hero => CommandError::HeroCannotAct,
            });
        };
        let applied = self.status.apply(target, kind, combatant);
        self.push_event(CombatEvent::StatusApplied {
            target,
            kind,
            stacks: applied.stacks,
        });
        Ok((
            "combat.status.applied",
            OutcomeData::StatusApplied {
                target,
                kind,
                applied,
            },
        ))
    }

    // ========================================================================
    // Internal transitions
    // ========================================================================

    /// Moves to `next` and runs phase-start effects. Ends the encounter in
    /// victory if status damage cleared the roster.
    fn enter_phase(&mut self, next: Phase) {
        let from = self.phase;
        self.phase = next;
        self.push_event(CombatEvent::PhaseChanged { from, to: next });
        debug!(%from, to = %next, "phase changed");

        let report = self.status.on_phase_start(&mut self.roster);
        for (target, kind) in report.expired {
            self.push_event(CombatEvent::StatusExpired { target, kind });
        }
        for StatusTick {
            target,
            kind,
            amount,
        } in report.ticks
        {
            self.deal_damage(target, amount, DamageSource::Status(kind));
        }

        if self.roster.enemies.is_empty() {
            self.finish(EncounterOutcome::Victory);
        }
    }

    /// Reports a phase entry, or the end of combat if the entry finished it.
    fn phase_entry_outcome(
        &self,
        message: &'static str,
        data: OutcomeData,
    ) -> (&'static str, OutcomeData) {
        match (&self.result, self.phase) {
            (Some(result), Phase::Complete) => {
                ("combat.victory", OutcomeData::CombatEnded(result.clone()))
            }
            _ => (message, data),
        }
    }

    /// Deals damage to a combatant after enrage and shields.
    ///
    /// The hero takes wounds, a unit takes a single wound, and an enemy
    /// sustains damage that counts toward its armor. Returns the damage that
    /// landed.
    fn deal_damage(&mut self, target: CombatantId, amount: u32, source: DamageSource) -> u32 {
        let landed = match target {
            CombatantId::Hero => {
                let hero = &mut self.roster.hero;
                let amount = hero.conditions.incoming_damage(amount);
                let landed = self.status.on_damage_taken(target, amount, hero);
                hero.wounds = hero.wounds.saturating_add(landed);
                self.wounds_received = self.wounds_received.saturating_add(landed);
                landed
            }
            CombatantId::Enemy(id) => {
                let Some(enemy) = self.roster.enemy_mut(id) else {
                    return 0;
                };
                let amount = enemy.conditions.incoming_damage(amount);
                let landed = self.status.on_damage_taken(target, amount, enemy);
                enemy.sustained_damage = enemy.sustained_damage.saturating_add(landed);
                let defeated = landed > 0
                    && enemy.sustained_damage >= current_armor(enemy, false, false);
                if defeated {
                    self.defeat_enemy(id);
                }
                landed
            }
            CombatantId::Unit(id) => {
                let Some(unit) = self.roster.unit_mut(id) else {
                    return 0;
                };
                if unit.state == UnitState::Destroyed {
                    return 0;
                }
                let amount = unit.conditions.incoming_damage(amount);
                let landed = self.status.on_damage_taken(target, amount, unit);
                if landed > 0 {
                    unit.take_wound(false);
                }
                landed
            }
        };

        if landed > 0 {
            self.push_event(CombatEvent::DamageApplied {
                target,
                amount: landed,
                source,
            });
        }
        landed
    }

    /// Removes a defeated enemy and awards its fame. Returns the fame.
    fn defeat_enemy(&mut self, id: EnemyId) -> u32 {
        let Some(enemy) = self.roster.remove_enemy(id) else {
            return 0;
        };
        self.status.forget(CombatantId::Enemy(id));
        self.blocks.remove(&id);
        self.ranged_credit.remove(&id);
        self.pending.retain(|p| p.source != id);

        self.defeated.push(id);
        self.fame_gained = self.fame_gained.saturating_add(enemy.fame);
        self.roster.hero.fame = self.roster.hero.fame.saturating_add(enemy.fame);
        self.push_event(CombatEvent::EnemyDefeated {
            enemy: id,
            fame: enemy.fame,
        });
        debug!(enemy = %id, key = %enemy.key, fame = enemy.fame, "enemy defeated");
        enemy.fame
    }

    /// Runs combat-end effects, records the result and completes the session.
    fn finish(&mut self, outcome: EncounterOutcome) -> CombatResult {
        let wounds_before = self.wounds_received;
        for tick in self.status.on_combat_end() {
            self.deal_damage(tick.target, tick.amount, DamageSource::Status(tick.kind));
        }
        let combat_end_wounds = self.wounds_received - wounds_before;

        let outcome = match outcome {
            EncounterOutcome::Defeat if self.roster.enemies.is_empty() => {
                EncounterOutcome::Victory
            }
            other => other,
        };

        let from = self.phase;
        self.phase = Phase::Complete;
        self.pending.clear();
        self.attack_bonus = 0;
        self.push_event(CombatEvent::PhaseChanged {
            from,
            to: Phase::Complete,
        });
        self.push_event(CombatEvent::CombatEnded { outcome });

        let result = CombatResult {
            outcome,
            enemies_defeated: self.defeated.clone(),
            fame_gained: self.fame_gained,
            wounds_received: self.wounds_received,
            poison_wounds: self.poison_wounds,
            combat_end_wounds,
            hero: self.roster.hero.clone(),
            units: self.roster.units.clone(),
        };
        debug!(
            %outcome,
            fame = result.fame_gained,
            wounds = result.wounds_received,
            "combat ended"
        );
        self.result = Some(result.clone());
        result
    }

    fn push_event(&mut self, event: CombatEvent) {
        if self.config.event_buffer_limit == 0 {
            return;
        }
        if self.events.len() >= self.config.event_buffer_limit {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Hero ranged and siege points after enrage and weaken.
///
/// The weaken penalty comes out of the ranged share first.
fn hero_points(conditions: &Conditions, ranged: u32, siege: u32) -> (u32, u32) {
    let total = conditions.outgoing_attack(ranged.saturating_add(siege));
    let siege = if conditions.is_enraged() { siege.saturating_mul(2) } else { siege }.min(total);
    (total - siege, siege)
}

fn ability_usable_in(ability: AbilityPhase, phase: Phase) -> bool {
    match phase {
        Phase::Ranged => matches!(ability, AbilityPhase::Ranged | AbilityPhase::Siege),
        Phase::Block => ability == AbilityPhase::Block,
        Phase::Attack => ability == AbilityPhase::Attack,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConditionFlags, UnitAbility};

    const NO_SUMMONS: [EnemyDefinition; 0] = [];

    fn start(enemies: Vec<EnemyDefinition>, units: Vec<Unit>) -> CombatSession {
        let mut session = CombatSession::default();
        let setup = EncounterSetup {
            hero: Hero::new(5, 3),
            enemies,
            units,
        };
        let outcome = session
            .initiate_combat(setup, &NO_SUMMONS)
            .expect("valid setup");
        assert!(outcome.success);
        session
    }

    #[test]
    fn rejected_commands_leave_state_untouched() {
        let mut session = start(vec![EnemyDefinition::new("orc", 3, 3, 2)], vec![]);
        let before = session.clone();

        let outcome = session.submit_attack(5, Element::Physical);
        assert!(!outcome.success);
        assert_eq!(outcome.message, "combat.invalid_phase");
        assert_eq!(session, before);

        let outcome = session.submit_ranged(EnemyId(9), 3, 0, Element::Physical);
        assert_eq!(outcome.error, Some(CommandError::EnemyNotFound(EnemyId(9))));
        assert_eq!(session, before);
    }

    #[test]
    fn initiate_rejected_while_running() {
        let mut session = start(vec![EnemyDefinition::new("orc", 3, 3, 2)], vec![]);
        let outcome = session
            .initiate_combat(EncounterSetup::default(), &NO_SUMMONS)
            .expect("no config error");
        assert!(!outcome.success);
        assert_eq!(session.enemies().len(), 1);
    }

    #[test]
    fn hero_points_split_penalty_from_ranged_first() {
        let mut conditions = Conditions::default();
        conditions.attack_penalty = 3;
        assert_eq!(hero_points(&conditions, 2, 3), (0, 2));
        conditions.flags |= ConditionFlags::ENRAGED;
        assert_eq!(hero_points(&conditions, 2, 3), (1, 6));
    }

    #[test]
    fn ranged_points_accumulate_within_phase() {
        let mut session = start(vec![EnemyDefinition::new("golem", 5, 2, 4)], vec![]);
        let first = session.submit_ranged(EnemyId(0), 3, 0, Element::Physical);
        assert_eq!(first.message, "combat.ranged.damaged");
        let second = session.submit_ranged(EnemyId(0), 2, 0, Element::Physical);
        assert_eq!(second.message, "combat.ranged.defeated");
        assert_eq!(session.hero().fame, 4);
        assert_eq!(session.totals().ranged, 5);
    }

    #[test]
    fn stunned_enemy_deals_no_damage() {
        let mut session = start(vec![EnemyDefinition::new("orc", 3, 4, 2)], vec![]);
        session.apply_status(EnemyId(0).into(), StatusEffectKind::Stun);
        session.end_ranged_phase();
        // stun lasts one phase start, so it expired on entering Block
        assert!(!session.enemy(EnemyId(0)).map_or(true, |e| e.conditions.is_stunned()));

        session.apply_status(EnemyId(0).into(), StatusEffectKind::Stun);
        let outcome = session.end_block_phase();
        assert!(!outcome.waiting_for_assignment());
        assert_eq!(session.phase(), Phase::Attack);
    }

    #[test]
    fn unit_attack_ability_adds_to_next_attack() {
        let swordsmen = Unit::new(UnitId(0), "swordsmen", 4).with_ability(UnitAbility::new(
            AbilityPhase::Attack,
            3,
            Element::Physical,
        ));
        let mut session = start(vec![EnemyDefinition::new("orc", 5, 2, 3)], vec![swordsmen]);
        session.end_ranged_phase();
        session.submit_block(EnemyId(0), &[BlockContribution::hero(2, Element::Physical)]);
        session.end_block_phase();

        let outcome = session.activate_unit(UnitId(0), 0, None);
        assert!(outcome.success, "{outcome:?}");
        assert_eq!(session.unit(UnitId(0)).map(|u| u.state), Some(UnitState::Exhausted));

        let outcome = session.submit_attack(2, Element::Physical);
        assert!(outcome.victory());
    }

    #[test]
    fn event_buffer_drops_oldest() {
        let config = CombatConfig {
            event_buffer_limit: 1,
            ..CombatConfig::default()
        };
        let mut session = CombatSession::new(config);
        let setup = EncounterSetup {
            hero: Hero::new(3, 0),
            enemies: vec![EnemyDefinition::new("orc", 3, 3, 2)],
            units: vec![],
        };
        session.initiate_combat(setup, &NO_SUMMONS).expect("valid setup");
        let events = session.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CombatEvent::PhaseChanged { to: Phase::Ranged, .. }));
        assert!(session.drain_events().is_empty());
    }
}
