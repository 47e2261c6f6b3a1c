pub mod impl_gui;
