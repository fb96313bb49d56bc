//! Virtual-machine provisioning boundary.
//!
//! The provisioning tool is an external collaborator. [`Provisioner`] is
//! the seam: bring an image up (streaming progress lines) and destroy it
//! again. [`VagrantProvisioner`] drives the real `vagrant` binary as a
//! subprocess; tests substitute their own implementation behind
//! `Arc<dyn Provisioner>`.

pub mod provisioner;
pub mod types;
pub mod vagrant;

pub use provisioner::Provisioner;
pub use types::MachineHandle;
pub use vagrant::VagrantProvisioner;
