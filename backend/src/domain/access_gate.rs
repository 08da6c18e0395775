use anyhow::Result;
use log::warn;

use crate::domain::profile_service::ProfileService;
use crate::domain::subscription_service::SubscriptionService;
use crate::errors::{AccessError, Feature};

/// Onboarding and subscription checks shared by every record service
#[derive(Clone)]
pub struct AccessGate {
    profile: ProfileService,
    subscription: SubscriptionService,
}

impl AccessGate {
    pub fn new(profile: ProfileService, subscription: SubscriptionService) -> Self {
        Self { profile, subscription }
    }

    /// Fail with an [`AccessError`] when `feature` is not available right now
    pub fn ensure(&self, feature: Feature) -> Result<()> {
        if feature == Feature::Profile {
            return Ok(());
        }
        if !self.profile.has_profile() {
            warn!("Denied {} access: onboarding not finished", feature);
            return Err(AccessError::OnboardingRequired.into());
        }
        if feature.is_gated() && self.subscription.is_locked()? {
            warn!("Denied {} access: subscription locked", feature);
            return Err(AccessError::Locked { feature }.into());
        }
        Ok(())
    }

    pub fn can_access(&self, feature: Feature) -> bool {
        self.ensure(feature).is_ok()
    }
}
