mod clock;
mod construction;
mod crafting;
mod harvesting;
