//! Registre des devices de lecture
//!
//! Les devices sont indexés par leur id distant stable ; le nom d'affichage
//! n'est jamais une clé (deux devices peuvent porter le même nom).

use crate::models::{Device, DeviceId};
use std::collections::HashMap;

/// Registre des devices connus, indexé par id
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<DeviceId, Device>,
    /// Ordre du listing distant, préservé pour l'affichage
    order: Vec<DeviceId>,
    /// Device actif pour la lecture, si connu
    active: Option<DeviceId>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace le contenu du registre par un nouveau listing
    ///
    /// Le device marqué actif par le listing devient le device actif local.
    pub fn replace_all(&mut self, devices: Vec<Device>) {
        self.devices.clear();
        self.order.clear();
        self.active = None;

        for device in devices {
            if device.is_active {
                self.active = Some(device.id.clone());
            }
            self.order.push(device.id.clone());
            self.devices.insert(device.id.clone(), device);
        }
    }

    /// Retourne un device par son id
    pub fn get(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    /// Liste les devices dans l'ordre du dernier listing
    pub fn list(&self) -> Vec<Device> {
        self.order
            .iter()
            .filter_map(|id| self.devices.get(id).cloned())
            .collect()
    }

    /// Recherche un device par son nom d'affichage (présentation uniquement)
    ///
    /// Premier device portant ce nom ; en cas de doublon, utiliser l'id.
    pub fn find_by_name(&self, display_name: &str) -> Option<&Device> {
        self.order
            .iter()
            .filter_map(|id| self.devices.get(id))
            .find(|d| d.display_name == display_name)
    }

    /// Retourne l'id du device actif, si connu
    pub fn active_id(&self) -> Option<&DeviceId> {
        self.active.as_ref()
    }

    /// Marque un device comme actif
    pub fn set_active(&mut self, id: &DeviceId) {
        if self.devices.contains_key(id) {
            self.active = Some(id.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }
}
