mod locations;
mod weather;
