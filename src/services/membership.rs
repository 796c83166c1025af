use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::{MembershipBookingRequest, StudioApi};
use crate::errors::FlowError;
use crate::models::{CorrelationState, FlowStage, MembershipPackage, NavState, PaymentMethod};
use crate::services::correlation::CorrelationTracker;

/// Static snapshot shown after a payment method has been chosen.
#[derive(Clone, Debug)]
pub struct Receipt {
    pub package_name: String,
    pub amount: f64,
    pub reference: String,
    pub payment_method: String,
    pub instructions: String,
}

/// The package-purchase flow that follows a class booking. Holds the
/// resolved correlation state and enforces gating, single-flight and the
/// completion sequence.
pub struct MembershipFlow<'a> {
    api: &'a dyn StudioApi,
    tracker: &'a CorrelationTracker,
    state: CorrelationState,
    package: Option<&'static MembershipPackage>,
    payment_method: Option<PaymentMethod>,
    in_flight: AtomicBool,
    reference_mismatch: bool,
}

impl<'a> MembershipFlow<'a> {
    /// Resolve state (navigation payload first, stored blob second) and
    /// restore any previously selected package and payment method.
    pub fn load(
        api: &'a dyn StudioApi,
        tracker: &'a CorrelationTracker,
        nav: Option<&NavState>,
    ) -> Result<Self, FlowError> {
        let state = tracker.load(nav)?;
        let package = state
            .package_id
            .as_deref()
            .and_then(MembershipPackage::find);
        let payment_method = state.payment_method.as_deref().and_then(PaymentMethod::parse);
        Ok(Self {
            api,
            tracker,
            state,
            package,
            payment_method,
            in_flight: AtomicBool::new(false),
            reference_mismatch: false,
        })
    }

    /// Gated until both class booking id and reference are known.
    pub fn is_gated(&self) -> bool {
        self.state.class_booking_id.is_none() || self.state.class_reference.is_none()
    }

    pub fn stage(&self) -> FlowStage {
        self.state.stage()
    }

    pub fn display_reference(&self) -> Option<&str> {
        self.state.display_reference()
    }

    pub fn selected_package(&self) -> Option<&'static MembershipPackage> {
        self.package
    }

    /// Whether the backend assigned the membership booking a reference
    /// different from the class one. Informational only.
    pub fn reference_mismatch(&self) -> bool {
        self.reference_mismatch
    }

    pub fn select_package(&mut self, package_id: &str) -> Result<&'static MembershipPackage, FlowError> {
        if self.is_gated() {
            return Err(FlowError::ClassBookingRequired);
        }
        let package = MembershipPackage::find(package_id)
            .ok_or_else(|| FlowError::UnknownPackage(package_id.to_string()))?;

        self.state.package_id = Some(package.id.to_string());
        self.tracker.save(&self.state)?;
        self.package = Some(package);
        Ok(package)
    }

    /// Choose how to pay. This is the step that creates the membership
    /// booking on the backend; choosing again after success returns the
    /// existing booking id without another request.
    pub async fn select_payment_method(
        &mut self,
        method: PaymentMethod,
    ) -> Result<i64, FlowError> {
        if self.is_gated() {
            return Err(FlowError::ClassBookingRequired);
        }
        let package = self.package.ok_or(FlowError::NoPackageSelected)?;

        if let Some(existing) = self.state.membership_booking_id {
            self.payment_method = Some(method);
            self.state.payment_method = Some(method.as_str().to_string());
            self.tracker.save(&self.state)?;
            return Ok(existing);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(FlowError::RequestInFlight);
        }

        let result = self.create_membership(package, method).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn create_membership(
        &mut self,
        package: &'static MembershipPackage,
        method: PaymentMethod,
    ) -> Result<i64, FlowError> {
        // guarded by is_gated above, but the request must never go out
        // without the correlation fields
        let (class_booking_id, reference) = match (
            self.state.class_booking_id,
            self.state.class_reference.clone(),
        ) {
            (Some(id), Some(r)) => (id, r),
            _ => return Err(FlowError::ClassBookingRequired),
        };

        let req = MembershipBookingRequest {
            package_id: package.id.to_string(),
            amount: package.price,
            reference_number: reference,
            class_booking_id,
        };
        // on failure nothing below runs, so state and selections survive
        let created = self.api.create_membership_booking(&req).await?;

        self.reference_mismatch = self.tracker.record_membership_booking(
            &mut self.state,
            created.booking_id,
            created.reference_number.as_deref(),
        )?;

        self.payment_method = Some(method);
        self.state.payment_method = Some(method.as_str().to_string());
        self.tracker.save(&self.state)?;

        tracing::info!(
            membership_booking_id = created.booking_id,
            package = package.id,
            method = method.as_str(),
            "membership booking created"
        );
        Ok(created.booking_id)
    }

    /// Mark the manual payment as made. On success every trace of the
    /// correlation is cleared; the next flow starts gated.
    pub async fn confirm_payment(&mut self) -> Result<(), FlowError> {
        let booking_id = self
            .state
            .membership_booking_id
            .ok_or(FlowError::PaymentNotReady)?;
        let method = self.payment_method.ok_or(FlowError::PaymentNotReady)?;

        self.api.update_payment(booking_id, method.as_str()).await?;

        self.tracker.clear()?;
        self.state = CorrelationState::default();
        self.package = None;
        self.payment_method = None;
        self.reference_mismatch = false;
        tracing::info!(booking_id, "payment confirmed, correlation cleared");
        Ok(())
    }

    /// Available once a payment method has produced a booking id.
    pub fn receipt(&self) -> Result<Receipt, FlowError> {
        if self.state.membership_booking_id.is_none() {
            return Err(FlowError::PaymentNotReady);
        }
        let method = self.payment_method.ok_or(FlowError::PaymentNotReady)?;
        let package = self.package.ok_or(FlowError::NoPackageSelected)?;
        let reference = self
            .state
            .display_reference()
            .ok_or(FlowError::ClassBookingRequired)?;

        Ok(Receipt {
            package_name: package.name.to_string(),
            amount: package.price,
            reference: reference.to_string(),
            payment_method: method.display_name().to_string(),
            instructions: method.instructions().to_string(),
        })
    }

    /// Abandon the flow: wipe stored state and in-memory selections.
    pub fn reset(&mut self) -> Result<(), FlowError> {
        self.tracker.clear()?;
        self.state = CorrelationState::default();
        self.package = None;
        self.payment_method = None;
        self.reference_mismatch = false;
        Ok(())
    }
}
