//! Address list operations.
//!
//! Invariant maintained by every mutation here: a non-empty list has exactly
//! one default entry after `add`, `remove` of the default, or `set_default`.

use bazaar_core::Address;

/// Append a new address for the given recipient.
///
/// The new entry is the default only when the list was empty.
pub fn add_address(addresses: &mut Vec<Address>, full_name: &str, phone: &str) -> usize {
    let is_default = addresses.is_empty();
    addresses.push(Address::for_recipient(full_name, phone, is_default));
    addresses.len() - 1
}

/// Remove the entry at `index`, returning it.
///
/// When the removed entry was the default and entries remain, the new first
/// entry becomes the only default.
pub fn remove_address(addresses: &mut Vec<Address>, index: usize) -> Option<Address> {
    if index >= addresses.len() {
        return None;
    }
    let removed = addresses.remove(index);

    if removed.is_default && !addresses.is_empty() {
        for (i, address) in addresses.iter_mut().enumerate() {
            address.is_default = i == 0;
        }
    }

    Some(removed)
}

/// Make the entry at `index` the only default.
///
/// Returns `false` (and changes nothing) when `index` is out of range.
pub fn set_default_address(addresses: &mut [Address], index: usize) -> bool {
    if index >= addresses.len() {
        return false;
    }
    for (i, address) in addresses.iter_mut().enumerate() {
        address.is_default = i == index;
    }
    true
}
