//! Card effect interpreter.
//!
//! [`apply_effect`] resolves one [`CardEffect`] against the state. Clauses are
//! independent and resolve in a fixed order:
//!
//! 1. resonance bonus merge
//! 2. target resolution
//! 3. damage and its on-hit hooks (attack cards only)
//! 4. block
//! 5. status consumption
//! 6. status application
//! 7. resources, then the conditional branch
//! 8. card manipulation and interactive prompts (player turn only)
//! 9. construct deployment
//! 10. enemy extras
//! 11. post-conditions: play milestones, victory check, construct cleanup
//!
//! Sub-effects recurse through the same function with `depth + 1`. A missing
//! template skips its clause. Once the encounter ends, remaining clauses are
//! skipped.
mod cards;
mod damage;
mod deploy;
mod lifecycle;
mod resources;
mod status;

pub(crate) use cards::{create_card, discard_from_hand, draw_cards};
pub(crate) use lifecycle::{
    check_victory, collect_dead_constructs, destroy_construct, handle_death, plan_intents,
};
pub(crate) use resources::gain_charge;
pub(crate) use status::apply_status_to;

use crate::action::{CardEffect, EffectSource};
use crate::config::CombatConfig;
use crate::env::{
    CardDefinition, CombatEnv, ConstructTemplate, EnemyTemplate, OracleError, RngOracle,
};
use crate::state::{CardId, CardType, CombatState, ConstructId, EnemyId, EntityId, LogKind};

use super::targeting::resolve_targets;

// ============================================================================
// Effect Context
// ============================================================================

/// Mutable state plus the oracles needed while resolving effects.
pub struct EffectContext<'a> {
    pub state: &'a mut CombatState,
    pub env: CombatEnv<'a>,
    pub config: &'a CombatConfig,
    pub rng: &'a dyn RngOracle,
    /// Set while the turn is closing; interactive prompts are skipped.
    pub prompts_closed: bool,
}

impl<'a> EffectContext<'a> {
    /// Builds a context. Config and rng oracles are mandatory.
    pub fn new(state: &'a mut CombatState, env: CombatEnv<'a>) -> Result<Self, OracleError> {
        let config = env.config()?.combat_config();
        let rng = env.rng()?;
        Ok(Self {
            state,
            env,
            config,
            rng,
            prompts_closed: false,
        })
    }

    pub fn card(&self, id: &CardId) -> Option<CardDefinition> {
        let card = self.env.cards().ok().and_then(|cards| cards.card(id));
        if card.is_none() {
            tracing::warn!("card template '{}' missing; clause skipped", id);
        }
        card
    }

    pub fn enemy_template(&self, id: &EnemyId) -> Option<EnemyTemplate> {
        let enemy = self.env.enemies().ok().and_then(|enemies| enemies.enemy(id));
        if enemy.is_none() {
            tracing::warn!("enemy template '{}' missing; clause skipped", id);
        }
        enemy
    }

    pub fn construct_template(&self, id: &ConstructId) -> Option<ConstructTemplate> {
        let construct = self
            .env
            .constructs()
            .ok()
            .and_then(|constructs| constructs.construct(id));
        if construct.is_none() {
            tracing::warn!("construct template '{}' missing; clause skipped", id);
        }
        construct
    }

    pub fn log(&mut self, kind: LogKind, message: impl Into<String>) {
        self.state.push_log(kind, message);
    }

    pub fn name(&self, id: EntityId) -> String {
        self.state.display_name(id)
    }
}

// ============================================================================
// Effect Call
// ============================================================================

/// Per-call inputs of the interpreter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectCall {
    pub source: EffectSource,
    /// Card whose effect is resolving, if any.
    pub card: Option<CardId>,
    /// `None` means the damage clause is not gated on card type.
    pub card_type: Option<CardType>,
    /// Explicit target chosen by the command or the parent effect.
    pub target: Option<EntityId>,
    /// Resolving an on-discard effect; post-play passives are skipped.
    pub discard_context: bool,
    pub depth: u32,
}

impl EffectCall {
    pub fn player_card(card: &CardDefinition, target: Option<EntityId>) -> Self {
        Self {
            source: EffectSource::Player,
            card: Some(card.id.clone()),
            card_type: Some(card.card_type),
            target,
            discard_context: false,
            depth: 0,
        }
    }

    pub fn enemy_card(enemy: EntityId, card: &CardDefinition) -> Self {
        Self {
            source: EffectSource::Enemy(enemy),
            card: Some(card.id.clone()),
            card_type: Some(card.card_type),
            target: None,
            discard_context: false,
            depth: 0,
        }
    }

    /// Effect with no card attached (statuses, constructs, death effects).
    pub fn passive(source: EffectSource, depth: u32) -> Self {
        Self {
            source,
            card: None,
            card_type: None,
            target: None,
            discard_context: false,
            depth,
        }
    }

    pub fn discard(card: &CardDefinition, depth: u32) -> Self {
        Self {
            discard_context: true,
            depth,
            ..Self::player_card(card, None)
        }
    }

    /// Child call for a sub-effect.
    pub fn nested(&self, target: Option<EntityId>) -> Self {
        Self {
            target,
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    fn allows_damage(&self) -> bool {
        self.card_type.is_none_or(|t| t == CardType::Attack)
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Resolves `effect` for `call`, mutating the state in place.
pub fn apply_effect(ctx: &mut EffectContext<'_>, effect: &CardEffect, call: &EffectCall) {
    if ctx.state.is_over() {
        return;
    }
    if call.depth > ctx.config.max_effect_depth {
        tracing::warn!(
            "effect nesting depth {} exceeds limit {}; sub-effect skipped",
            call.depth,
            ctx.config.max_effect_depth
        );
        return;
    }

    // 1. resonance
    let merged;
    let effect = match &effect.resonance {
        Some(resonance)
            if call.source.is_player()
                && resonance.previous.matches(ctx.state.last_played.as_ref()) =>
        {
            let mut boosted = effect.clone();
            resonance.bonus.merge_into(&mut boosted);
            ctx.log(LogKind::Card, "Resonance!");
            merged = boosted;
            &merged
        }
        _ => effect,
    };

    // 2. targets
    let targets = resolve_targets(
        ctx.state,
        ctx.rng,
        ctx.config,
        call.source,
        effect.target,
        call.target,
    );
    let primary = targets.first().copied();

    // 3. damage
    if let Some(spec) = &effect.damage
        && call.allows_damage()
    {
        damage::resolve_damage(ctx, spec, effect.target, call, &targets);
        if ctx.state.is_over() {
            return;
        }
    }

    // 4. block
    if let Some(spec) = &effect.block {
        resources::gain_block(ctx, spec, call, primary);
    }

    // 5. status consumption
    if let Some(spec) = &effect.consume_status {
        status::consume_status(ctx, spec, call, primary);
        if ctx.state.is_over() {
            return;
        }
    }

    // 6. status application
    if !effect.apply_status.is_empty() {
        status::apply_statuses(ctx, &effect.apply_status, call, &targets);
    }

    // 7. resources and conditional branch
    if let Some(spec) = &effect.resources {
        resources::apply_resources(ctx, spec, call);
    }
    if let Some(conditional) = &effect.conditional {
        let source = call.source.entity();
        let branch = if conditional.condition.evaluate(ctx.state, source, primary) {
            Some(conditional.then.as_ref())
        } else {
            conditional.otherwise.as_deref()
        };
        if let Some(branch) = branch {
            apply_effect(ctx, branch, &call.nested(primary));
            if ctx.state.is_over() {
                return;
            }
        }
    }

    // 8. cards and interactive prompts
    if let Some(spec) = &effect.cards {
        cards::apply_card_manipulation(ctx, spec, call);
    }
    if let Some(spec) = &effect.interactive {
        cards::open_interactive(ctx, spec, call, primary);
    }

    // 9. deploy
    if let Some(template) = &effect.deploy {
        deploy::deploy_construct(ctx, template, call, primary);
    }

    // 10. enemy extras
    if let (Some(spec), EffectSource::Enemy(enemy)) = (&effect.enemy, call.source) {
        lifecycle::apply_enemy_extras(ctx, spec, enemy, call.depth);
    }

    // 11. post-conditions
    if call.depth == 0
        && call.source.is_player()
        && !call.discard_context
        && let Some(card_type) = call.card_type
    {
        resources::play_passives(ctx, card_type);
    }
    collect_dead_constructs(ctx);
    check_victory(ctx);
}
