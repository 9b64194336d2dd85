use bevy::prelude::*;
use bits_helpers::RibbitMessageHandler;
use bits_helpers::restart::Restartable;
use ribbit_bits::{BitDuration, BitResult};

use crate::model::GameState;
use crate::session::{Session, SessionSnapshot, SessionStatus};

#[derive(Default, Clone, Copy)]
pub struct VehicleParking;

/// What the host is told when it ends the bit.
pub fn bit_result(snapshot: Option<&SessionSnapshot>) -> BitResult {
    match snapshot {
        Some(snapshot) if snapshot.status != SessionStatus::Lost => {
            BitResult::HighestScore(u32::try_from(snapshot.score).unwrap_or_default().into())
        }
        _ => BitResult::Failure,
    }
}

impl RibbitMessageHandler for VehicleParking {
    fn restart(world: &mut World) {
        info!("Restarting VehicleParking");

        if let Some(mut session) = world.get_resource_mut::<Session>() {
            session.reset();
        }
        world
            .resource_mut::<NextState<GameState>>()
            .set(Session::initial_state());
    }

    fn end(world: &mut World) -> BitResult {
        info!("Ending VehicleParking");

        let snapshot = world.get_resource::<Session>().map(Session::snapshot);
        if *world.resource::<State<GameState>>().get() == GameState::Playing {
            let next = match snapshot.as_ref().map(|snapshot| snapshot.status) {
                Some(SessionStatus::Lost) => GameState::Lost,
                _ => GameState::Won,
            };
            world.resource_mut::<NextState<GameState>>().set(next);
        }

        bit_result(snapshot.as_ref())
    }

    fn duration(_world: &mut World) -> BitDuration {
        BitDuration::max_duration()
    }
}
