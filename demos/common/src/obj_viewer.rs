//! View an OBJ mesh, optionally textured.
//!
//! The mesh comes from [`PlatformServices::obj_path`] and its texture from
//! [`PlatformServices::obj_texture_path`]. Without a texture, the mesh is lit by a diffuse light
//! at the eye instead.

use crate::{
  shaders::BuiltinShader,
  shared::{begin_frame, load_matrices, load_mvp, setup_render_state, Handled, OrbitView},
  Backend, DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::Point3;
use ngl::{
  context::GraphicsContext,
  obj::Obj,
  shader::ShaderLib,
  texture::{Sampling, Texture2D},
  vao::{BindVao, SimpleVao},
};

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  mesh: SimpleVao<Backend>,
  texture: Option<Texture2D<Backend>>,
}

impl LocalExample {
  fn shader(&self) -> BuiltinShader {
    if self.texture.is_some() {
      BuiltinShader::Texture
    } else {
      BuiltinShader::Diffuse
    }
  }
}

impl Example for LocalExample {
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    setup_render_state(context);
    let backend = context.backend();
    let view = OrbitView::new(Point3::new(0., 1., 10.), 0.05, 350.);

    let path = platform
      .obj_path()
      .ok_or(DemoError::MissingAsset("OBJ file"))?;
    let obj = Obj::load(path)?;

    let (center, radius) = obj.bounding_sphere();
    log::info!(
      "bounding sphere: centre ({}, {}, {}), radius {}",
      center.x,
      center.y,
      center.z,
      radius
    );

    let mesh = obj.create_vao(backend)?;

    let texture = match platform.obj_texture_path() {
      Some(path) => Some(Texture2D::load(backend, path, Sampling::default())?),
      None => None,
    };

    let mut shaders = ShaderLib::new();

    if texture.is_some() {
      BuiltinShader::Texture.load(&mut shaders, backend)?;
      shaders.use_program(backend, BuiltinShader::Texture.name())?;
      shaders.set_uniform(backend, "tex", 0i32)?;
    } else {
      BuiltinShader::Diffuse.load(&mut shaders, backend)?;
      shaders.use_program(backend, BuiltinShader::Diffuse.name())?;
      shaders.set_uniform(backend, "Colour", [1f32; 4])?;
      shaders.set_uniform(backend, "lightPos", view.eye)?;
      shaders.set_uniform(backend, "lightDiffuse", [1f32; 4])?;
    }

    Ok(LocalExample {
      view,
      shaders,
      mesh,
      texture,
    })
  }

  fn render_frame(
    mut self,
    _: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<LoopFeedback<Self>, DemoError> {
    for action in actions {
      if self.view.handle(&action, context) == Handled::Exit {
        return Ok(LoopFeedback::Exit);
      }
    }

    begin_frame(context, self.view.size());
    let backend = context.backend();
    let shader = self.shader();

    self.shaders.use_program(backend, shader.name())?;

    match self.texture {
      Some(ref texture) => {
        texture.bind(backend, 0);
        load_mvp(
          &mut self.shaders,
          backend,
          self.view.mouse_tx(),
          self.view.view,
          self.view.project(),
        )?;
      }

      None => load_matrices(
        &mut self.shaders,
        backend,
        self.view.mouse_tx(),
        self.view.view,
        self.view.project(),
      )?,
    }

    self.mesh.bind(backend).draw()?;

    Ok(LoopFeedback::Continue(self))
  }
}
