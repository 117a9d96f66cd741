use combat_core::{
    AbilityPhase, AssignmentViolation, BlockContribution, CombatCommand, CombatSession,
    CombatantId, CommandError, ConfigError, Element, EncounterOutcome, EncounterSetup,
    EnemyAbilities, EnemyDefinition, EnemyId, Hero, OutcomeData, Phase, Resistances,
    StatusEffectKind, Unit, UnitAbility, UnitId, UnitState,
};

fn catalog() -> Vec<EnemyDefinition> {
    vec![EnemyDefinition::new("wolf", 2, 3, 2)]
}

fn begin(enemies: Vec<EnemyDefinition>, units: Vec<Unit>) -> CombatSession {
    let mut session = CombatSession::default();
    let setup = EncounterSetup {
        hero: Hero::new(5, 4),
        enemies,
        units,
    };
    let outcome = session
        .initiate_combat(setup, &catalog())
        .expect("setup should be valid");
    assert!(outcome.success);
    assert_eq!(session.phase(), Phase::Ranged);
    session
}

fn peasants(id: u32) -> Unit {
    Unit::new(UnitId(id), "peasants", 3)
}

/// Moves an encounter with no ranged or block play straight to damage assignment.
fn skip_to_damage(session: &mut CombatSession) {
    assert!(session.end_ranged_phase().success);
    let outcome = session.end_block_phase();
    assert!(outcome.waiting_for_assignment(), "{outcome:?}");
    assert_eq!(session.phase(), Phase::Damage);
}

// ============================================================================
// Abilities
// ============================================================================

#[test]
fn brutal_unblocked_attack_doubles_wounds_only() {
    let orc = EnemyDefinition::new("orc", 4, 5, 2).with_abilities(EnemyAbilities::BRUTAL);
    let mut session = begin(vec![orc], vec![]);
    skip_to_damage(&mut session);

    let outcome = session.resolve_remainder();
    assert!(outcome.success);
    let OutcomeData::DamageResolved {
        wounds_received, ..
    } = outcome.data
    else {
        panic!("unexpected data: {:?}", outcome.data);
    };
    assert_eq!(wounds_received, 10);
    assert_eq!(session.hero().wounds, 10);

    let orc = session.enemy(EnemyId(0)).expect("orc still standing");
    assert_eq!(orc.armor, 4);
    assert_eq!(orc.attack, 5);
}

#[test]
fn fortified_enemy_ignores_ranged_but_not_siege() {
    let tower = EnemyDefinition::new("tower", 3, 0, 4).with_abilities(EnemyAbilities::FORTIFIED);
    let mut session = begin(vec![tower], vec![]);

    let outcome = session.submit_ranged(EnemyId(0), 5, 0, Element::Physical);
    assert!(outcome.success, "fortification is a no-effect result, not an error");
    assert_eq!(outcome.message, "combat.ranged.fortified");
    assert!(session.enemy(EnemyId(0)).is_some());

    let outcome = session.submit_ranged(EnemyId(0), 0, 3, Element::Physical);
    assert_eq!(outcome.message, "combat.ranged.defeated");
    assert_eq!(session.hero().fame, 4);

    let outcome = session.end_ranged_phase();
    assert!(outcome.victory());
    assert_eq!(session.phase(), Phase::Complete);
}

#[test]
fn resisted_element_is_halved() {
    let salamander =
        EnemyDefinition::new("salamander", 4, 0, 3).with_resistances(Resistances::FIRE);
    let mut session = begin(vec![salamander], vec![]);

    let outcome = session.submit_ranged(EnemyId(0), 5, 0, Element::Fire);
    let OutcomeData::RangedResolved {
        applied, defeated, ..
    } = outcome.data
    else {
        panic!("unexpected data: {:?}", outcome.data);
    };
    assert_eq!(applied, 2);
    assert!(!defeated);
}

#[test]
fn swift_enemy_needs_double_block_across_submissions() {
    let wolf = EnemyDefinition::new("wolf", 2, 3, 2).with_abilities(EnemyAbilities::SWIFT);
    let mut session = begin(vec![wolf], vec![]);
    session.end_ranged_phase();

    let outcome = session.submit_block(EnemyId(0), &[BlockContribution::hero(4, Element::Physical)]);
    assert_eq!(outcome.message, "combat.block.insufficient");

    let outcome = session.submit_block(EnemyId(0), &[BlockContribution::hero(2, Element::Physical)]);
    assert_eq!(outcome.message, "combat.block.efficient");
    assert!(session.block_status(EnemyId(0)).is_some_and(|b| b.blocked));

    let outcome = session.submit_block(EnemyId(0), &[BlockContribution::hero(1, Element::Physical)]);
    assert_eq!(outcome.error, Some(CommandError::EnemyAlreadyBlocked(EnemyId(0))));
}

#[test]
fn cumbersome_enemy_accepts_movement_as_block() {
    let golem = EnemyDefinition::new("golem", 5, 5, 4).with_abilities(EnemyAbilities::CUMBERSOME);
    let mut session = begin(vec![golem], vec![]);
    session.end_ranged_phase();

    let outcome = session.submit_block(EnemyId(0), &[BlockContribution::hero(2, Element::Physical)]);
    let OutcomeData::BlockResolved { assessment, .. } = outcome.data else {
        panic!("unexpected data: {:?}", outcome.data);
    };
    assert!(assessment.blocked);
    assert_eq!(assessment.movement_used, 3);
    assert_eq!(session.hero().movement_points, 1);
}

#[test]
fn inefficient_unit_block_counts_half() {
    let troll = EnemyDefinition::new("troll", 4, 3, 3);
    let mut session = begin(vec![troll.clone(), troll], vec![]);
    session.end_ranged_phase();

    let outcome = session.submit_block(EnemyId(0), &[BlockContribution::unit(5, Element::Fire)]);
    assert_eq!(outcome.message, "combat.block.insufficient");
    let outcome = session.submit_block(EnemyId(1), &[BlockContribution::unit(6, Element::Fire)]);
    assert_eq!(outcome.message, "combat.block.inefficient");
}

#[test]
fn elusive_enemy_uses_reduced_armor_once_blocked() {
    let shade = EnemyDefinition::new("shade", 6, 2, 5)
        .with_abilities(EnemyAbilities::ELUSIVE)
        .with_reduced_armor(2);
    let mut session = begin(vec![shade], vec![]);
    session.end_ranged_phase();
    session.submit_block(EnemyId(0), &[BlockContribution::hero(2, Element::Physical)]);
    session.end_block_phase();
    assert_eq!(session.phase(), Phase::Attack);

    let outcome = session.submit_attack(2, Element::Physical);
    assert!(outcome.victory());
}

#[test]
fn vampiric_enemy_heals_after_wounding() {
    let bat = EnemyDefinition::new("bat", 3, 2, 2).with_abilities(EnemyAbilities::VAMPIRIC);
    let mut session = begin(vec![bat], vec![]);
    skip_to_damage(&mut session);
    session.resolve_remainder();

    assert_eq!(session.enemy(EnemyId(0)).map(|e| e.armor_bonus), Some(1));
    let outcome = session.submit_attack(3, Element::Physical);
    assert!(!outcome.victory());
}

// ============================================================================
// Damage assignment
// ============================================================================

#[test]
fn assassin_wounds_cannot_go_to_units() {
    let assassin = EnemyDefinition::new("assassin", 3, 3, 3).with_abilities(EnemyAbilities::ASSASSIN);
    let mut session = begin(vec![assassin], vec![peasants(0)]);
    skip_to_damage(&mut session);

    let before = session.clone();
    let outcome = session.assign_damage(UnitId(0), EnemyId(0));
    assert!(!outcome.success);
    assert_eq!(outcome.message, "combat.assign.assassin");
    assert_eq!(
        outcome.error,
        Some(CommandError::IllegalDamageAssignment {
            unit: UnitId(0),
            source_enemy: EnemyId(0),
            reason: AssignmentViolation::AssassinSource,
        })
    );
    assert_eq!(session, before);

    session.resolve_remainder();
    assert_eq!(session.hero().wounds, 3);
    assert_eq!(session.unit(UnitId(0)).map(|u| u.state), Some(UnitState::Ready));
}

#[test]
fn each_unit_absorbs_one_wound() {
    let orc = EnemyDefinition::new("orc", 3, 3, 2);
    let mut session = begin(vec![orc], vec![peasants(0), peasants(1)]);
    skip_to_damage(&mut session);

    let outcome = session.assign_damage(UnitId(0), EnemyId(0));
    let OutcomeData::DamageAssigned {
        unit_state,
        unit_armor,
        wounds_left,
        ..
    } = outcome.data
    else {
        panic!("unexpected data: {:?}", outcome.data);
    };
    assert_eq!(unit_state, UnitState::Wounded);
    assert_eq!(unit_armor, 3);
    assert_eq!(wounds_left, 2);

    let outcome = session.assign_damage(UnitId(0), EnemyId(0));
    assert_eq!(outcome.message, "combat.assign.unit_not_ready");

    assert!(session.assign_damage(UnitId(1), EnemyId(0)).success);
    session.resolve_remainder();
    assert_eq!(session.hero().wounds, 1);
}

#[test]
fn poisonous_wounds_destroy_units_and_fill_discard() {
    let spider = EnemyDefinition::new("spider", 3, 2, 3).with_abilities(EnemyAbilities::POISON);
    let mut session = begin(vec![spider], vec![peasants(0)]);
    skip_to_damage(&mut session);

    let outcome = session.assign_damage(UnitId(0), EnemyId(0));
    assert_eq!(outcome.message, "combat.damage.unit_destroyed");

    let outcome = session.resolve_remainder();
    let OutcomeData::DamageResolved {
        wounds_received,
        poison_wounds,
        ..
    } = outcome.data
    else {
        panic!("unexpected data: {:?}", outcome.data);
    };
    assert_eq!(wounds_received, 1);
    assert_eq!(poison_wounds, 1);
    assert_eq!(session.hero().discarded_wounds, 1);
}

#[test]
fn paralyze_discards_hand_once_per_resolution() {
    let medusa = EnemyDefinition::new("medusa", 4, 2, 4).with_abilities(EnemyAbilities::PARALYZE);
    let basilisk = EnemyDefinition::new("basilisk", 4, 3, 4).with_abilities(EnemyAbilities::PARALYZE);
    let mut session = begin(vec![medusa, basilisk], vec![]);
    skip_to_damage(&mut session);

    let outcome = session.resolve_remainder();
    let OutcomeData::DamageResolved {
        wounds_received,
        paralyze_triggered,
        cards_discarded,
        ..
    } = outcome.data
    else {
        panic!("unexpected data: {:?}", outcome.data);
    };
    assert_eq!(wounds_received, 5);
    assert!(paralyze_triggered);
    assert_eq!(cards_discarded, 5);
    assert_eq!(session.hero().hand_cards, 0);
    assert_eq!(session.hero().wounds, 5);
}

#[test]
fn paralyze_wound_on_a_unit_still_discards_hand() {
    let medusa = EnemyDefinition::new("medusa", 6, 1, 4).with_abilities(EnemyAbilities::PARALYZE);
    let mut session = begin(vec![medusa], vec![peasants(0)]);
    skip_to_damage(&mut session);

    let outcome = session.assign_damage(UnitId(0), EnemyId(0));
    assert_eq!(outcome.message, "combat.damage.unit_destroyed");

    let outcome = session.resolve_remainder();
    let OutcomeData::DamageResolved {
        wounds_received,
        paralyze_triggered,
        cards_discarded,
        ..
    } = outcome.data
    else {
        panic!("unexpected data: {:?}", outcome.data);
    };
    assert_eq!(wounds_received, 0);
    assert!(paralyze_triggered);
    assert_eq!(cards_discarded, 5);
    assert_eq!(session.hero().hand_cards, 0);
}

// ============================================================================
// Oversized submissions
// ============================================================================

#[test]
fn maximal_ranged_points_saturate() {
    let mut session = begin(vec![EnemyDefinition::new("wolf", 2, 3, 2)], vec![]);

    let outcome = session.submit_ranged(EnemyId(0), u32::MAX, 1, Element::Physical);
    assert!(outcome.success, "{outcome:?}");
    assert_eq!(outcome.message, "combat.ranged.defeated");
    assert_eq!(session.totals().ranged, u32::MAX);
}

#[test]
fn maximal_block_contributions_saturate() {
    let mut session = begin(vec![EnemyDefinition::new("wolf", 2, 3, 2)], vec![]);
    session.end_ranged_phase();

    let outcome = session.submit_block(
        EnemyId(0),
        &[
            BlockContribution::hero(u32::MAX, Element::Physical),
            BlockContribution::hero(1, Element::Physical),
        ],
    );
    assert!(outcome.success, "{outcome:?}");
    assert!(session.block_status(EnemyId(0)).is_some_and(|b| b.blocked));
    assert_eq!(session.totals().block, u32::MAX);
}

#[test]
fn enraged_hero_maximal_attack_saturates() {
    let mut session = begin(vec![EnemyDefinition::new("wolf", 2, 3, 2)], vec![]);
    session.end_ranged_phase();
    session.submit_block(EnemyId(0), &[BlockContribution::hero(3, Element::Physical)]);
    session.end_block_phase();
    assert_eq!(session.phase(), Phase::Attack);

    assert!(session.apply_status(CombatantId::Hero, StatusEffectKind::Enrage).success);
    let outcome = session.submit_attack(u32::MAX, Element::Physical);
    assert!(outcome.victory(), "{outcome:?}");
    let OutcomeData::AttackResolved { discarded, .. } = outcome.data else {
        panic!("unexpected data: {:?}", outcome.data);
    };
    assert_eq!(discarded, u32::MAX - 2);
}

// ============================================================================
// Attack allocation
// ============================================================================

#[test]
fn attack_consumes_weakest_enemies_first() {
    let keep = EnemyDefinition::new("keep", 5, 0, 4);
    let scout = EnemyDefinition::new("scout", 2, 0, 1);
    let mut session = begin(vec![keep, scout], vec![]);
    session.end_ranged_phase();
    session.end_block_phase();
    assert_eq!(session.phase(), Phase::Attack);

    let outcome = session.submit_attack(4, Element::Physical);
    let OutcomeData::AttackResolved {
        ref enemies_defeated,
        discarded,
        victory,
        ..
    } = outcome.data
    else {
        panic!("unexpected data: {:?}", outcome.data);
    };
    assert_eq!(enemies_defeated, &vec![EnemyId(1)]);
    assert_eq!(discarded, 2);
    assert!(!victory);

    let result = session.result().expect("combat is over");
    assert_eq!(result.outcome, EncounterOutcome::Defeat);
    assert_eq!(result.fame_gained, 1);
}

#[test]
fn unit_siege_ability_hits_fortified_enemy() {
    let catapult = Unit::new(UnitId(0), "catapult", 3).with_ability(UnitAbility::new(
        AbilityPhase::Siege,
        4,
        Element::Physical,
    ));
    let keep = EnemyDefinition::new("keep", 4, 2, 5).with_abilities(EnemyAbilities::FORTIFIED);
    let mut session = begin(vec![keep], vec![catapult]);

    let outcome = session.activate_unit(UnitId(0), 0, None);
    assert_eq!(outcome.error, Some(CommandError::MissingTarget));

    let outcome = session.activate_unit(UnitId(0), 0, Some(EnemyId(0)));
    assert!(outcome.success, "{outcome:?}");
    assert!(session.enemy(EnemyId(0)).is_none());
    assert_eq!(session.unit(UnitId(0)).map(|u| u.state), Some(UnitState::Exhausted));

    let outcome = session.activate_unit(UnitId(0), 0, Some(EnemyId(0)));
    assert_eq!(outcome.error, Some(CommandError::UnitNotReady(UnitId(0))));
}

// ============================================================================
// Summoning
// ============================================================================

#[test]
fn summoned_enemy_joins_untargetable_and_fameless() {
    let summoner = EnemyDefinition::new("orc_summoner", 4, 2, 3)
        .with_abilities(EnemyAbilities::SUMMONER)
        .with_summons("wolf");
    let mut session = begin(vec![summoner], vec![]);

    assert_eq!(session.enemies().len(), 2);
    let wolf = session.enemy(EnemyId(1)).expect("wolf summoned");
    assert_eq!(wolf.summoned_by, Some(EnemyId(0)));
    assert_eq!(wolf.fame, 0);

    let outcome = session.submit_ranged(EnemyId(1), 5, 0, Element::Physical);
    assert_eq!(outcome.error, Some(CommandError::EnemyNotTargetable(EnemyId(1))));

    session.end_ranged_phase();
    let outcome = session.submit_block(EnemyId(1), &[BlockContribution::hero(3, Element::Physical)]);
    assert!(outcome.success);
}

#[test]
fn missing_summon_definition_is_a_config_error() {
    let summoner = EnemyDefinition::new("necromancer", 4, 2, 3)
        .with_abilities(EnemyAbilities::SUMMONER)
        .with_summons("dragon");
    let mut session = CombatSession::default();
    let setup = EncounterSetup {
        hero: Hero::new(5, 0),
        enemies: vec![summoner],
        units: vec![],
    };

    let error = session.initiate_combat(setup, &catalog()).unwrap_err();
    assert_eq!(error, ConfigError::MissingEnemyDefinition("dragon".into()));
    assert_eq!(session.phase(), Phase::NotInCombat);
}

// ============================================================================
// Status effects
// ============================================================================

#[test]
fn burn_can_finish_an_enemy_between_phases() {
    let imp = EnemyDefinition::new("imp", 3, 0, 2);
    let mut session = begin(vec![imp], vec![]);
    for _ in 0..3 {
        session.apply_status(EnemyId(0).into(), StatusEffectKind::Burn);
    }

    let outcome = session.end_ranged_phase();
    assert!(outcome.victory(), "{outcome:?}");
    let result = session.take_result().expect("combat is over");
    assert_eq!(result.enemies_defeated, vec![EnemyId(0)]);
    assert_eq!(result.fame_gained, 2);
}

#[test]
fn stunned_hero_cannot_attack() {
    let mut session = begin(vec![EnemyDefinition::new("orc", 3, 0, 2)], vec![]);
    session.apply_status(CombatantId::Hero, StatusEffectKind::Stun);
    let outcome = session.submit_ranged(EnemyId(0), 3, 0, Element::Physical);
    assert_eq!(outcome.error, Some(CommandError::HeroCannotAct));
}

#[test]
fn poison_wounds_hero_when_combat_ends() {
    let mut session = begin(vec![EnemyDefinition::new("orc", 3, 0, 2)], vec![]);
    session.apply_status(CombatantId::Hero, StatusEffectKind::Poison);
    session.apply_status(CombatantId::Hero, StatusEffectKind::Poison);

    let outcome = session.retreat();
    let OutcomeData::CombatEnded(result) = outcome.data else {
        panic!("unexpected data: {:?}", outcome.data);
    };
    assert_eq!(result.outcome, EncounterOutcome::Retreated);
    assert_eq!(result.combat_end_wounds, 2);
    assert_eq!(result.hero.wounds, 2);
}

#[test]
fn unknown_effect_key_is_a_config_error() {
    let mut session = begin(vec![EnemyDefinition::new("orc", 3, 0, 2)], vec![]);
    let error = session
        .apply_status_by_key(CombatantId::Hero, "petrify")
        .unwrap_err();
    assert_eq!(error, ConfigError::UnknownEffectType("petrify".into()));

    let outcome = session
        .apply_status_by_key(CombatantId::Hero, "Freeze")
        .expect("known key");
    assert!(outcome.success);
    assert!(session.hero().conditions.is_frozen());
}

#[test]
fn new_encounter_clears_leftover_effects() {
    let mut session = begin(vec![EnemyDefinition::new("orc", 3, 0, 2)], vec![]);
    session.apply_status(CombatantId::Hero, StatusEffectKind::Freeze);
    session.retreat();
    assert_eq!(session.status().len(), 1);

    let setup = EncounterSetup {
        hero: Hero::new(4, 2),
        enemies: vec![EnemyDefinition::new("wolf", 2, 3, 2)],
        units: vec![],
    };
    session
        .initiate_combat(setup, &catalog())
        .expect("setup should be valid");
    assert!(session.status().is_empty());
    assert!(!session.hero().conditions.is_frozen());
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn execute_dispatches_and_rejects_out_of_phase() {
    let mut session = begin(vec![EnemyDefinition::new("orc", 3, 2, 2)], vec![]);

    let outcome = session.execute(&CombatCommand::ResolveRemainder);
    assert_eq!(outcome.message, "combat.invalid_phase");
    assert_eq!(outcome.phase, Phase::Ranged);

    let commands = [
        CombatCommand::EndRangedPhase,
        CombatCommand::block(EnemyId(0), &[BlockContribution::hero(2, Element::Physical)]),
        CombatCommand::EndBlockPhase,
        CombatCommand::SubmitAttack {
            total: 3,
            element: Element::Physical,
        },
    ];
    for command in &commands {
        let outcome = session.execute(command);
        assert!(outcome.success, "{command:?} failed: {outcome:?}");
    }
    assert_eq!(session.phase(), Phase::Complete);
    assert_eq!(
        session.result().map(|r| r.outcome),
        Some(EncounterOutcome::Victory)
    );
}
