//! Per-conversation flags: topics already discussed and inhibited options

use super::event::{read_event_bool, set_event_flag, EventPointer};
use super::offsets::{CONVERSATION_DISCUSSED, CONVERSATION_INHIBITED};
use crate::error::Result;
use crate::save::SaveBuffer;

pub fn read_conversation_item_clicked(save: &SaveBuffer, event: EventPointer) -> Result<bool> {
    read_event_bool(save, CONVERSATION_DISCUSSED.pointer(event.into())?)
}

pub fn set_conversation_item_clicked(save: &mut SaveBuffer, event: EventPointer) -> Result<()> {
    set_event_flag(save, CONVERSATION_DISCUSSED.pointer(event.into())?, true)
}

pub fn check_conversation_option_inhibited(
    save: &SaveBuffer,
    event: EventPointer,
) -> Result<bool> {
    read_event_bool(save, CONVERSATION_INHIBITED.pointer(event.into())?)
}

pub fn set_conversation_option_inhibited(
    save: &mut SaveBuffer,
    event: EventPointer,
    inhibited: bool,
) -> Result<()> {
    set_event_flag(save, CONVERSATION_INHIBITED.pointer(event.into())?, inhibited)
}
