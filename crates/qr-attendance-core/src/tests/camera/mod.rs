mod controller;
mod frame;
mod replay;
