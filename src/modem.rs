//! [`Gsm`] and [`Gprs`] over a blocking `atat` client.

use atat::blocking::AtatClient;

use crate::command::{
    device_lock::{types::PinStatusCode, GetPinStatus, SetPin},
    network_service::GetNetworkRegistrationStatus,
    psn::{
        types::{GPRSAttachedState, DEFAULT_CONTEXT_ID},
        GetGPRSAttached, SetGPRSAttached, SetPDPContextDefinition,
    },
    AT,
};
use crate::config::Apn;
use crate::error::Error;
use crate::gprs::Gprs;
use crate::gsm::Gsm;

/// Modem driven through typed AT commands.
///
/// Every call sends a handful of commands and returns; nothing here waits for
/// the network to come up.
pub struct AtModem<A: AtatClient> {
    at: A,
}

impl<A: AtatClient> AtModem<A> {
    pub fn new(at: A) -> Self {
        Self { at }
    }

    pub fn client(&mut self) -> &mut A {
        &mut self.at
    }

    pub fn free(self) -> A {
        self.at
    }
}

impl<A: AtatClient> Gsm for AtModem<A> {
    fn begin(&mut self, pin: Option<&str>) -> Result<(), Error> {
        self.at.send(&AT)?;

        let pin_status = self.at.send(&GetPinStatus)?;
        match (pin_status.code, pin) {
            (PinStatusCode::Ready, _) => {}
            (PinStatusCode::SimPin, Some(pin)) => {
                info!("Entering SIM PIN");
                self.at.send(&SetPin { pin })?;
            }
            (code, _) => {
                warn!("SIM locked: {:?}", code);
                return Err(Error::Pin);
            }
        }

        let registration = self.at.send(&GetNetworkRegistrationStatus)?;
        if !registration.stat.is_registered() {
            debug!("Not registered: {:?}", registration.stat);
            return Err(Error::Registration);
        }

        Ok(())
    }
}

impl<A: AtatClient> Gprs for AtModem<A> {
    fn attach_gprs(&mut self, apn: &Apn) -> Result<(), Error> {
        if let Apn::Given { name, .. } = apn {
            self.at.send(&SetPDPContextDefinition {
                cid: DEFAULT_CONTEXT_ID,
                pdp_type: "IP",
                apn: name,
            })?;
        }

        self.at.send(&SetGPRSAttached {
            state: GPRSAttachedState::Attached,
        })?;

        let attached = self.at.send(&GetGPRSAttached)?;
        if attached.state != GPRSAttachedState::Attached {
            return Err(Error::Attach);
        }
        Ok(())
    }

    fn detach_gprs(&mut self) -> Result<(), Error> {
        self.at.send(&SetGPRSAttached {
            state: GPRSAttachedState::Detached,
        })?;
        Ok(())
    }
}
