mod element;
mod group;
mod pipette;
