use shared::CargoMovementResponse;

use crate::domain::commands::cargo_movement::CreateCargoMovementCommand;
use crate::domain::errors::CargoMovementError;
use crate::domain::models::cargo_movement::{CargoMovementDocument, NewCargoMovement};

pub struct CargoMovementMapper;

impl CargoMovementMapper {
    /// Convert a create command into the record to persist.
    /// Fails if the movement date has not been assigned yet.
    pub fn to_record(command: CreateCargoMovementCommand) -> Result<NewCargoMovement, CargoMovementError> {
        Ok(NewCargoMovement {
            cargo_id: command.cargo_id.to_string(),
            movement_date: required("movementDate", command.movement_date)?,
            from_location: command.from_location,
            to_location: command.to_location,
        })
    }

    /// Convert a stored document into the response DTO.
    /// Fails on the first absent field.
    pub fn to_response(document: CargoMovementDocument) -> Result<CargoMovementResponse, CargoMovementError> {
        Ok(CargoMovementResponse {
            id: required("_id", document.id)?,
            cargo_id: required("cargoId", document.cargo_id)?,
            movement_date: required("movementDate", document.movement_date)?,
            from_location: required("fromLocation", document.from_location)?,
            to_location: required("toLocation", document.to_location)?,
        })
    }
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, CargoMovementError> {
    value.ok_or(CargoMovementError::InvalidInput { field })
}
