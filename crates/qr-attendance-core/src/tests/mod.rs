mod camera;
mod support;
