//! Element: identity and type of anything that can be a group member.

use serde::{Deserialize, Serialize};

use crate::error::{MiniPoolError, ValidationError};
use crate::id::ElementId;

/// Kind of pool element.
///
/// The physical kinds are leaf hardware channels, each owned by exactly one
/// controller. The other kinds are composites defined in terms of other
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Motor,
    CounterTimer,
    ZeroDChannel,
    OneDChannel,
    TwoDChannel,
    IoRegister,
    CommunicationChannel,
    PseudoMotor,
    PseudoCounter,
    MotorGroup,
    MeasurementGroup,
}

impl ElementType {
    /// Whether elements of this kind are leaves owned by a controller.
    #[must_use]
    pub fn is_physical(self) -> bool {
        matches!(
            self,
            Self::Motor
                | Self::CounterTimer
                | Self::ZeroDChannel
                | Self::OneDChannel
                | Self::TwoDChannel
                | Self::IoRegister
                | Self::CommunicationChannel
        )
    }
}

/// Identity shared by every element: id, user-visible name, and kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: ElementId,
    pub name: String,
    pub element_type: ElementType,
}

impl ElementInfo {
    /// Create a builder for an element of the given kind.
    #[must_use]
    pub fn builder(element_type: ElementType) -> ElementInfoBuilder {
        ElementInfoBuilder {
            id: None,
            name: None,
            element_type,
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MiniPoolError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), MiniPoolError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`ElementInfo`].
#[derive(Debug)]
pub struct ElementInfoBuilder {
    id: Option<ElementId>,
    name: Option<String>,
    element_type: ElementType,
}

impl ElementInfoBuilder {
    #[must_use]
    pub fn id(mut self, id: ElementId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Consume the builder, validate, and return an [`ElementInfo`].
    ///
    /// # Errors
    ///
    /// Returns [`MiniPoolError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<ElementInfo, MiniPoolError> {
        let info = ElementInfo {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            element_type: self.element_type,
        };
        info.validate()?;
        Ok(info)
    }
}
