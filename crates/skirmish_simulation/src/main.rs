//! Headless skirmish
//!
//! Dagger (derelict) против titan (sharded): сближение, обмен уроном, команды, смерть.

use skirmish_simulation::{
    DamageDealt, SimulationConfig, SimulationContext, StateChanged, Team, UnitCommand, UnitDied,
};

fn main() {
    let config = SimulationConfig::default();
    println!("Starting skirmish headless simulation ({} Hz)", config.fixed_hz);

    let mut ctx = SimulationContext::new(config);

    let (dagger, titan) = match (
        ctx.spawn("dagger", Team::DERELICT, 0.0, 0.0),
        ctx.spawn("titan", Team::SHARDED, 100.0, 100.0),
    ) {
        (Ok(dagger), Ok(titan)) => (dagger, titan),
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("Failed to spawn units: {}", err);
            return;
        }
    };

    // Титан подходит на 10м за тик, пока не окажется в радиусе
    for tick in 0..60 {
        if let Some(mut unit) = ctx.unit_mut(titan) {
            let pos = unit.position();
            unit.set((pos.x - 10.0).max(5.0), (pos.y - 10.0).max(5.0));
        }

        if ctx.unit(dagger).is_some_and(|u| u.is_shooting()) {
            ctx.queue_damage(titan, 9.0);
        }
        if ctx.unit(titan).is_some_and(|u| u.is_shooting()) {
            ctx.queue_damage(dagger, 20.0);
        }
        if tick == 5 {
            ctx.queue_team_command(Team::DERELICT, UnitCommand::Retreat);
        }
        if tick == 8 {
            ctx.queue_command(dagger, UnitCommand::Attack);
        }

        ctx.step();

        for event in ctx.drain_events::<StateChanged>() {
            println!("Tick {}: {:?} {} → {} ({})", tick, event.entity, event.from, event.to, event.command);
        }
        for event in ctx.drain_events::<DamageDealt>() {
            println!(
                "Tick {}: {:?} took {} damage ({} → {})",
                tick, event.target, event.amount, event.health_before, event.health_after
            );
        }
        for event in ctx.drain_events::<UnitDied>() {
            println!("Tick {}: {:?} ({} team) died", tick, event.entity, event.team);
        }

        if ctx.live_units().len() < 2 {
            break;
        }
    }

    let clock = ctx.clock();
    println!(
        "Simulation complete: {} ticks, {:.2}s, {} live units",
        clock.tick,
        clock.elapsed,
        ctx.live_units().len()
    );
}
