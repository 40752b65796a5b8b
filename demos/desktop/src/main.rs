mod platform;

use glfw::{Action, Key, MouseButton, WindowEvent};
use ngl_demos::{Example, InputAction, LoopFeedback};
use ngl_glfw::GlfwSurface;
use ngl_windowing::{WindowDim, WindowOpt};
use platform::DesktopPlatformServices;
use std::{error::Error, iter, path::PathBuf, time::Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct CLIOpts {
  #[structopt(short, long)]
  /// Directory where to pick textures and texture packs from.
  textures: Option<PathBuf>,

  #[structopt(short, long)]
  /// Directory where to pick the default OBJ meshes from.
  meshes: Option<PathBuf>,

  #[structopt(long)]
  /// OBJ file to view with obj-viewer.
  obj: Option<PathBuf>,

  #[structopt(long)]
  /// Texture applied to the OBJ file viewed with obj-viewer.
  texture: Option<PathBuf>,

  #[structopt(long)]
  /// Seed used by the demos generating random scenes.
  seed: Option<u64>,

  #[structopt(short, long)]
  /// List available examples.
  list_examples: bool,

  /// Example to run.
  example: Option<String>,
}

/// Macro to declaratively add examples.
macro_rules! examples {
  ($($ex_name:literal, $ex_ident:ident),* $(,)?) => {
    fn show_available_examples() {
      println!("available examples:");
      $( println!("  - {}", $ex_name); )*
    }

    // run an example based on its name
    fn pick_and_run_example(cli_opts: CLIOpts) {
      let example_name = cli_opts.example.clone();
      let r = match example_name.as_deref() {
        $(
          Some($ex_name) => run_example::<ngl_demos::$ex_ident::LocalExample>(cli_opts, $ex_name),
        )*

        _ => {
          log::error!("no example found");
          show_available_examples();
          Ok(())
        }
      };

      if let Err(e) = r {
        log::error!("{}", e);
      }
    }
  }
}

const WINDOW_WIDTH: u32 = 1024;
const WINDOW_HEIGHT: u32 = 720;

// Run an example until it exits or fails.
fn run_example<E>(cli_opts: CLIOpts, name: &str) -> Result<(), Box<dyn Error>>
where
  E: Example,
{
  // check the features so that we know what we need to load
  let mut services = DesktopPlatformServices::new(cli_opts, E::features())?;

  let dim = WindowDim::Windowed {
    width: WINDOW_WIDTH,
    height: WINDOW_HEIGHT,
  };
  let surface = GlfwSurface::new_gl41(name, WindowOpt::default().set_dim(dim))?;
  let mut context = surface.context;
  let events = surface.events_rx;

  let example = E::bootstrap(&mut services, &mut context)?;
  let start_t = Instant::now();

  // the first frame gets the actual framebuffer size, which can differ from the window size on
  // high-DPI screens
  let [width, height] = context.size();
  let feedback = example.render_frame(
    0.,
    iter::once(InputAction::Resized { width, height }),
    &mut context,
  )?;
  let mut example = match feedback {
    LoopFeedback::Exit => return Ok(()),
    LoopFeedback::Continue(example) => example,
  };

  loop {
    context.window.glfw.poll_events();
    let actions = glfw::flush_messages(&events).flat_map(|(_, event)| adapt_events(event));

    let t = start_t.elapsed().as_secs_f32();
    match example.render_frame(t, actions, &mut context)? {
      LoopFeedback::Continue(stepped) => {
        example = stepped;
        context.swap_buffers();
      }

      LoopFeedback::Exit => break,
    }
  }

  log::info!("bye");
  Ok(())
}

fn adapt_events(event: WindowEvent) -> Option<InputAction> {
  match event {
    WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Release, _) => {
      Some(InputAction::Quit)
    }

    WindowEvent::Key(key, _, Action::Press, _) | WindowEvent::Key(key, _, Action::Repeat, _) => {
      log::debug!("key press: {:?}", key);
      match key {
        Key::W => Some(InputAction::Wireframe),
        Key::S => Some(InputAction::Fill),
        Key::Space => Some(InputAction::Reset),
        Key::Up => Some(InputAction::Forward),
        Key::Down => Some(InputAction::Backward),
        Key::Left => Some(InputAction::Left),
        Key::Right => Some(InputAction::Right),
        Key::A => Some(InputAction::Key('a')),
        Key::R => Some(InputAction::Key('r')),
        Key::Num1 => Some(InputAction::Key('1')),
        Key::Num2 => Some(InputAction::Key('2')),
        Key::Num3 => Some(InputAction::Key('3')),
        Key::Num4 => Some(InputAction::Key('4')),
        Key::Num5 => Some(InputAction::Key('5')),
        Key::Num6 => Some(InputAction::Key('6')),
        Key::Num7 => Some(InputAction::Key('7')),
        Key::Num8 => Some(InputAction::Key('8')),
        _ => None,
      }
    }

    WindowEvent::MouseButton(MouseButton::Button1, action, _) => match action {
      Action::Press => Some(InputAction::PrimaryPressed),
      Action::Release => Some(InputAction::PrimaryReleased),
      _ => None,
    },

    WindowEvent::MouseButton(MouseButton::Button2, action, _) => match action {
      Action::Press => Some(InputAction::SecondaryPressed),
      Action::Release => Some(InputAction::SecondaryReleased),
      _ => None,
    },

    WindowEvent::CursorPos(x, y) => Some(InputAction::CursorMoved {
      x: x as _,
      y: y as _,
    }),

    WindowEvent::FramebufferSize(width, height) => Some(InputAction::Resized {
      width: width.max(0) as _,
      height: height.max(0) as _,
    }),

    WindowEvent::Scroll(_, amount) => Some(InputAction::VScroll {
      amount: amount as f32,
    }),

    _ => None,
  }
}

examples! {
  "blank", blank,
  "boid", boid,
  "boid-shaded", boid_shaded,
  "multi-buffer-vao", multi_buffer_vao,
  "changing-vao", changing_vao,
  "changing-vao-multi-buffer", changing_vao_multi_buffer,
  "simple-index-vao", simple_index_vao,
  "extended-vao", extended_vao,
  "sphere", sphere,
  "vao-primitives", vao_primitives,
  "simple-pbr", simple_pbr,
  "pbr-texture", pbr_texture,
  "simple-fbo", simple_fbo,
  "blit", blit,
  "obj-viewer", obj_viewer,
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
  let cli_opts = CLIOpts::from_args();

  if cli_opts.list_examples {
    show_available_examples();
  } else {
    pick_and_run_example(cli_opts);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use glfw::{Modifiers, Scancode};

  const SCANCODE: Scancode = 0;

  fn key(key: Key, action: Action) -> WindowEvent {
    WindowEvent::Key(key, SCANCODE, action, Modifiers::empty())
  }

  #[test]
  fn quitting() {
    assert_eq!(adapt_events(WindowEvent::Close), Some(InputAction::Quit));
    assert_eq!(
      adapt_events(key(Key::Escape, Action::Release)),
      Some(InputAction::Quit)
    );
    assert_eq!(adapt_events(key(Key::Escape, Action::Press)), None);
  }

  #[test]
  fn render_keys() {
    assert_eq!(
      adapt_events(key(Key::W, Action::Press)),
      Some(InputAction::Wireframe)
    );
    assert_eq!(adapt_events(key(Key::S, Action::Press)), Some(InputAction::Fill));
    assert_eq!(
      adapt_events(key(Key::Space, Action::Press)),
      Some(InputAction::Reset)
    );
    assert_eq!(adapt_events(key(Key::W, Action::Release)), None);
  }

  #[test]
  fn arrows_repeat() {
    assert_eq!(
      adapt_events(key(Key::Up, Action::Repeat)),
      Some(InputAction::Forward)
    );
    assert_eq!(
      adapt_events(key(Key::Left, Action::Press)),
      Some(InputAction::Left)
    );
  }

  #[test]
  fn character_keys() {
    assert_eq!(
      adapt_events(key(Key::Num3, Action::Press)),
      Some(InputAction::Key('3'))
    );
    assert_eq!(
      adapt_events(key(Key::R, Action::Press)),
      Some(InputAction::Key('r'))
    );
    assert_eq!(adapt_events(key(Key::Num9, Action::Press)), None);
  }

  #[test]
  fn mouse() {
    assert_eq!(
      adapt_events(WindowEvent::MouseButton(
        MouseButton::Button2,
        Action::Press,
        Modifiers::empty()
      )),
      Some(InputAction::SecondaryPressed)
    );
    assert_eq!(
      adapt_events(WindowEvent::CursorPos(10., 20.)),
      Some(InputAction::CursorMoved { x: 10., y: 20. })
    );
    assert_eq!(
      adapt_events(WindowEvent::FramebufferSize(800, 600)),
      Some(InputAction::Resized {
        width: 800,
        height: 600
      })
    );
  }
}
